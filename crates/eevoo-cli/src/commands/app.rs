use crate::output::{Ui, format_size};
use eevoo_build::{
    BuildContext, DockerfileGenerator, DockerfileTemplate, GeneratedFile, WriteAction, generate,
};
use eevoo_core::{BuildEnv, EevooConfig, NodeProject, tags};
use eevoo_docker::{DockerClient, DockerError, DockerExecutor};
use std::path::{Path, PathBuf};

/// Build, test, and tag the Node.js app in the current directory.
pub async fn app(
    docker: Option<String>,
    generate_files: bool,
    interactive: bool,
) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = EevooConfig::load(&project_dir)?;
    let client = DockerClient::new(config.docker_binary(docker));
    let ui = Ui::new(interactive);

    let outcome = run(
        &project_dir,
        &config,
        &BuildEnv::from_env(),
        &client,
        &ui,
        generate_files,
    )
    .await?;

    tracing::debug!(
        prod = %outcome.image_id_prod,
        dev = %outcome.image_id_dev,
        tags = ?outcome.tags,
        "app images ready"
    );
    Ok(())
}

/// Result of a successful app pipeline run.
#[derive(Debug)]
pub(crate) struct AppOutcome {
    pub image_id_prod: String,
    pub image_id_dev: String,
    pub tags: Vec<String>,
}

/// Run the app pipeline: detect → build prod/dev → test → tag → (generate).
///
/// Every docker call is awaited before the next; the first failure
/// returns and nothing after it runs.
pub(crate) async fn run<E: DockerExecutor>(
    project_dir: &Path,
    config: &EevooConfig,
    build_env: &BuildEnv,
    client: &DockerClient<E>,
    ui: &Ui,
    generate_files: bool,
) -> anyhow::Result<AppOutcome> {
    let project = detect_project(project_dir, ui)?;
    ui.blank();

    confirm_project_name(&project, ui)?;
    ui.blank();

    let node_version = node_version(&project, config, ui)?;
    let base_image = config.base_image_ref(&node_version);
    let generator = DockerfileGenerator::new(&base_image);

    let images = build_images(&project, &generator, client, ui).await?;
    ui.blank();

    run_unit_tests(&images.dev, client, ui).await?;
    ui.blank();

    let tags = tag_image(&project, &images.prod, build_env, client, ui).await?;
    ui.blank();

    if generate_files {
        generate_dockerfile(&project, &generator, ui)?;
        ui.blank();
    }

    Ok(AppOutcome {
        image_id_prod: images.prod,
        image_id_dev: images.dev,
        tags,
    })
}

fn detect_project(project_dir: &Path, ui: &Ui) -> anyhow::Result<NodeProject> {
    let project = NodeProject::detect(project_dir)?;

    if !ui.confirm("Current directory identified as Node.js project. Is it correct?")? {
        anyhow::bail!("project is mis-identified as a Node.js app");
    }
    ui.success("Project identified as Node.js");

    Ok(project)
}

fn confirm_project_name(project: &NodeProject, ui: &Ui) -> anyhow::Result<()> {
    let name = &project.name;
    if !ui.confirm(&format!("The name of the project is \"{name}\". Is it correct?"))? {
        anyhow::bail!("the name of the project should be in \"package.json\"");
    }
    ui.success(format!("Obtained name of the project: {name} (from package.json)"));
    Ok(())
}

fn node_version(project: &NodeProject, config: &EevooConfig, ui: &Ui) -> anyhow::Result<String> {
    let version = project
        .node_version_or(&config.image.default_node_version)
        .to_owned();

    if !ui.confirm(&format!("Node.js version required is: {version}"))? {
        anyhow::bail!("failed to guess required Node.js version");
    }
    ui.success(format!("Node.js version required for this project: {version}"));

    Ok(version)
}

struct AppImages {
    prod: String,
    dev: String,
}

async fn build_images<E: DockerExecutor>(
    project: &NodeProject,
    generator: &DockerfileGenerator<'_>,
    client: &DockerClient<E>,
    ui: &Ui,
) -> anyhow::Result<AppImages> {
    let spinner = ui.spinner("Copying project to temp. directory")?;
    let context = BuildContext::create(&project.dir)?;

    spinner.set_message("Generating Dockerfile for production");
    context.write_dockerfile(&generator.render(DockerfileTemplate::Production))?;

    spinner.set_message("Building Docker image");
    let prod = client.build_image(context.path()).await?;

    spinner.set_message("Generating Dockerfile for development");
    context.write_dockerfile(&generator.render(DockerfileTemplate::Development))?;

    spinner.set_message("Building Docker image for development");
    let dev = client.build_image(context.path()).await?;

    spinner.set_message("Removing temp directory");
    drop(context);

    spinner.set_message("Getting image information");
    let node_version = client.run(&prod, &["node", "-v"]).await?;
    let npm_version = client.run(&prod, &["npm", "-v"]).await?;
    let size = client.image_size(&prod).await?;
    drop(spinner);

    ui.success("Docker image correctly built");
    ui.log(format!("Node.js version: {node_version}"));
    ui.log(format!("npm version:     {npm_version}"));
    ui.log(format!("Docker image (prod) ID: {prod}"));
    ui.log(format!("Docker image (dev) ID : {dev}"));
    ui.log(format!("Docker image size (prod): {}", format_size(size)));
    ui.tip(format!("Run the image with `docker run {prod} --env-file .env`"));

    Ok(AppImages { prod, dev })
}

async fn run_unit_tests<E: DockerExecutor>(
    image_id: &str,
    client: &DockerClient<E>,
    ui: &Ui,
) -> anyhow::Result<()> {
    let spinner = ui.spinner("Running unit test")?;
    let result = client.run(image_id, &["npm", "test"]).await;
    drop(spinner);

    match result {
        Ok(_) => {
            ui.success("Unit test run successfully");
            Ok(())
        }
        Err(e @ DockerError::CommandFailed { .. }) => {
            if let Some(stdout) = e.stdout() {
                ui.log(stdout);
            }
            if let Some(stderr) = e.stderr() {
                ui.log(stderr);
            }
            ui.blank();
            ui.error("Unit test failed. See results above");
            ui.tip("Fix the tests by using `npm test` (it is probably faster than this tool)");
            ui.tip(format!("Worked? Then try `docker run {image_id} npm test`"));
            ui.blank();
            anyhow::bail!("unit tests failed in image {image_id}")
        }
        Err(e) => Err(e.into()),
    }
}

async fn tag_image<E: DockerExecutor>(
    project: &NodeProject,
    image_id: &str,
    build_env: &BuildEnv,
    client: &DockerClient<E>,
    ui: &Ui,
) -> anyhow::Result<Vec<String>> {
    let tags = tags::app_tags(&project.name, build_env);

    let spinner = ui.spinner("Tagging docker image")?;
    for tag in &tags {
        spinner.set_message(format!("Tagging docker image: \"{tag}\""));
        client.tag_image(image_id, tag).await?;
    }
    drop(spinner);

    ui.success("Docker image tagged successfully");
    for tag in &tags {
        ui.log(format!("Image is tagged as \"{tag}\""));
    }
    for tag in &tags {
        ui.tip(format!("Run the image with `docker run {tag} --env-file .env`"));
    }

    Ok(tags)
}

fn generate_dockerfile(
    project: &NodeProject,
    generator: &DockerfileGenerator<'_>,
    ui: &Ui,
) -> anyhow::Result<()> {
    let spinner = ui.spinner("Generating Dockerfile")?;
    let files = generate(
        &project.dir,
        &generator.render(DockerfileTemplate::Production),
    )?;
    drop(spinner);

    report_generated(&files.dockerfile, ui);
    report_generated(&files.dockerignore, ui);
    ui.tip("Reproduce the Docker build yourself: `docker build .`");

    Ok(())
}

fn report_generated(file: &GeneratedFile, ui: &Ui) {
    let name = console::style(file.name()).bold();
    match file.action {
        WriteAction::Overwritten => {
            ui.warn(format!("Overwritten {name} with the one used to build the image"))
        }
        WriteAction::Created => ui.success(format!("Generated {name} used to build the image")),
    }
}
