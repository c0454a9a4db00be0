use eevoo_docker::client::DockerClient;
use eevoo_docker::error::DockerError;
use eevoo_docker::executor::DockerExecutor;
use mockall::mock;
use mockall::predicate::eq;
use tempfile::TempDir;

mock! {
    Executor {}

    impl DockerExecutor for Executor {
        async fn exec(&self, args: &[String]) -> Result<String, DockerError>;
        async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError>;
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| (*s).to_owned()).collect()
}

fn failed(args: &[String], stderr: &str) -> DockerError {
    DockerError::CommandFailed {
        program: "docker".to_owned(),
        args: args.to_vec(),
        status: "exit status: 1".to_owned(),
        stdout: String::new(),
        stderr: stderr.to_owned(),
    }
}

/// Simulates `docker image build --iidfile <path>` writing the image ID.
fn write_iidfile(args: &[String], id: &str) {
    let pos = args.iter().position(|a| a == "--iidfile").unwrap();
    std::fs::write(&args[pos + 1], id).unwrap();
}

fn context_with_dockerfile() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("Dockerfile"), "FROM scratch\n").unwrap();
    tmp
}

// ── Version ──

#[tokio::test]
async fn version_queries_server_version() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .with(eq(owned(&["version", "--format", "{{.Server.Version}}"])))
        .times(1)
        .returning(|_| Ok("24.0.7\n".to_owned()));

    let client = DockerClient::with_executor(mock);
    assert_eq!(client.version().await.unwrap(), "24.0.7");
}

#[tokio::test]
async fn version_propagates_missing_binary() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|_| {
        Err(DockerError::NotFound {
            program: "docker".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    });

    let client = DockerClient::with_executor(mock);
    let err = client.version().await.unwrap_err();
    assert!(matches!(err, DockerError::NotFound { .. }));
    assert!(err.to_string().contains("executable not found"));
}

// ── Build ──

#[tokio::test]
async fn build_returns_id_from_iidfile() {
    let ctx = context_with_dockerfile();
    let ctx_str = ctx.path().to_string_lossy().to_string();

    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .withf(move |args| {
            args.len() == 5
                && args[0] == "image"
                && args[1] == "build"
                && args[2] == "--iidfile"
                && args[4] == ctx_str
        })
        .times(1)
        .returning(|args| {
            write_iidfile(args, "sha256:abc123\n");
            Ok(String::new())
        });

    let client = DockerClient::with_executor(mock);
    let id = client.build_image(ctx.path()).await.unwrap();
    assert_eq!(id, "sha256:abc123");
}

#[tokio::test]
async fn build_uses_a_fresh_iidfile_each_time() {
    let ctx = context_with_dockerfile();
    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::<String>::new()));
    let seen_in_mock = seen.clone();

    let mut mock = MockExecutor::new();
    mock.expect_exec().times(2).returning(move |args| {
        let pos = args.iter().position(|a| a == "--iidfile").unwrap();
        seen_in_mock.lock().unwrap().push(args[pos + 1].clone());
        write_iidfile(args, "sha256:x");
        Ok(String::new())
    });

    let client = DockerClient::with_executor(mock);
    client.build_image(ctx.path()).await.unwrap();
    client.build_image(ctx.path()).await.unwrap();

    let paths = seen.lock().unwrap();
    assert_ne!(paths[0], paths[1]);
    assert!(!std::path::Path::new(&paths[0]).exists(), "iidfile cleaned up");
}

#[tokio::test]
async fn build_without_dockerfile_never_invokes_docker() {
    let ctx = TempDir::new().unwrap();

    let mut mock = MockExecutor::new();
    mock.expect_exec().never();

    let client = DockerClient::with_executor(mock);
    let err = client.build_image(ctx.path()).await.unwrap_err();
    assert!(matches!(err, DockerError::MissingDockerfile(_)));
}

#[tokio::test]
async fn build_failure_carries_captured_output() {
    let ctx = context_with_dockerfile();

    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .returning(|args| Err(failed(args, "failed to solve: npm ERR!")));

    let client = DockerClient::with_executor(mock);
    let err = client.build_image(ctx.path()).await.unwrap_err();

    assert_eq!(err.stderr(), Some("failed to solve: npm ERR!"));
    let msg = err.to_string();
    assert!(msg.contains("image build"), "got: {msg}");
    assert!(msg.contains("npm ERR!"), "got: {msg}");
}

#[tokio::test]
async fn build_without_iidfile_is_an_error() {
    let ctx = context_with_dockerfile();

    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|_| Ok(String::new()));

    let client = DockerClient::with_executor(mock);
    let err = client.build_image(ctx.path()).await.unwrap_err();
    assert!(matches!(err, DockerError::MissingImageId(_)));
}

// ── Inspect / Run ──

#[tokio::test]
async fn image_size_parses_bytes() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .with(eq(owned(&[
            "image",
            "inspect",
            "sha256:abc",
            "--format={{.Size}}",
        ])))
        .returning(|_| Ok("91234567\n".to_owned()));

    let client = DockerClient::with_executor(mock);
    assert_eq!(client.image_size("sha256:abc").await.unwrap(), 91_234_567);
}

#[tokio::test]
async fn image_size_rejects_non_numeric_output() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|_| Ok("<no value>\n".to_owned()));

    let client = DockerClient::with_executor(mock);
    let err = client.image_size("sha256:abc").await.unwrap_err();
    assert!(matches!(err, DockerError::InvalidImageSize { .. }));
}

#[tokio::test]
async fn run_passes_command_after_image() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .with(eq(owned(&["run", "--rm", "sha256:abc", "node", "-v"])))
        .returning(|_| Ok("v12.16.1\n".to_owned()));

    let client = DockerClient::with_executor(mock);
    assert_eq!(
        client.run("sha256:abc", &["node", "-v"]).await.unwrap(),
        "v12.16.1"
    );
}

// ── Tag / Push ──

#[tokio::test]
async fn tag_image_issues_image_tag() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .with(eq(owned(&["image", "tag", "sha256:abc", "my-app:latest"])))
        .times(1)
        .returning(|_| Ok(String::new()));

    let client = DockerClient::with_executor(mock);
    client.tag_image("sha256:abc", "my-app:latest").await.unwrap();
}

#[tokio::test]
async fn push_streams_output() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().never();
    mock.expect_exec_streaming()
        .with(eq(owned(&["push", "kthse/nodejs-echo:12"])))
        .times(1)
        .returning(|_| Ok(()));

    let client = DockerClient::with_executor(mock);
    client.push("kthse/nodejs-echo:12").await.unwrap();
}

#[tokio::test]
async fn push_failure_propagates() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .returning(|args| Err(failed(args, "denied: requested access to the resource is denied")));

    let client = DockerClient::with_executor(mock);
    assert!(client.push("kthse/nodejs-echo:12").await.is_err());
}
