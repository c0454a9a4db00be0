//! Mock engine shared by the command pipeline tests.

use eevoo_docker::{DockerError, DockerExecutor};
use mockall::mock;

mock! {
    pub Executor {}

    impl DockerExecutor for Executor {
        async fn exec(&self, args: &[String]) -> Result<String, DockerError>;
        async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError>;
    }
}

pub(crate) fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| (*s).to_owned()).collect()
}

pub(crate) fn failed(args: &[String], stdout: &str) -> DockerError {
    DockerError::CommandFailed {
        program: "docker".to_owned(),
        args: args.to_vec(),
        status: "exit status: 1".to_owned(),
        stdout: stdout.to_owned(),
        stderr: String::new(),
    }
}

/// Plays the engine's part of `docker image build --iidfile <path>`.
pub(crate) fn write_iidfile(args: &[String], id: &str) {
    let pos = args.iter().position(|a| a == "--iidfile").unwrap();
    std::fs::write(&args[pos + 1], id).unwrap();
}
