use crate::output::{Ui, format_size};
use eevoo_build::{BaseImageDockerfile, BuildContext};
use eevoo_core::{EevooConfig, tags};
use eevoo_docker::{DockerClient, DockerExecutor};
use std::path::PathBuf;

/// Build and tag the shared Node.js base image.
pub async fn node(
    docker: Option<String>,
    node_version: Option<String>,
    push: bool,
) -> anyhow::Result<()> {
    let config = EevooConfig::load(&PathBuf::from("."))?;
    let client = DockerClient::new(config.docker_binary(docker));
    let version = match node_version {
        Some(version) => version,
        None => config.image.default_node_version.clone(),
    };

    let outcome = run(&config, &version, &client, &Ui::new(false), push).await?;
    tracing::debug!(image = %outcome.image_id, tags = ?outcome.tags, "base image ready");
    Ok(())
}

#[derive(Debug)]
pub(crate) struct NodeOutcome {
    pub image_id: String,
    pub tags: Vec<String>,
}

/// Run the node pipeline: engine info → build → inspect → tag → (push).
pub(crate) async fn run<E: DockerExecutor>(
    config: &EevooConfig,
    node_version: &str,
    client: &DockerClient<E>,
    ui: &Ui,
    push: bool,
) -> anyhow::Result<NodeOutcome> {
    let engine = client.version().await?;
    ui.success(format!("Docker version: {engine}"));
    ui.blank();

    let spinner = ui.spinner("Generating Dockerfile for the base image")?;
    let dockerfile = BaseImageDockerfile::new(&config.image.node_image, node_version).render();
    let context = BuildContext::with_dockerfile(&dockerfile)?;

    spinner.set_message(format!(
        "Building base image from {}:{node_version}-alpine",
        config.image.node_image
    ));
    let image_id = client.build_image(context.path()).await?;
    drop(context);

    spinner.set_message("Getting image information");
    let node_output = client.run(&image_id, &["node", "-v"]).await?;
    let npm_version = client.run(&image_id, &["npm", "-v"]).await?;
    let size = client.image_size(&image_id).await?;
    drop(spinner);

    ui.success("Base image correctly built");
    ui.log(format!("Node.js version: {node_output}"));
    ui.log(format!("npm version:     {npm_version}"));
    ui.log(format!("Docker image ID: {image_id}"));
    ui.log(format!("Docker image size: {}", format_size(size)));
    ui.blank();

    let tags = tags::base_image_tags(&config.image.base_image, &node_output)?;

    let spinner = ui.spinner("Tagging base image")?;
    for tag in &tags {
        spinner.set_message(format!("Tagging base image: \"{tag}\""));
        client.tag_image(&image_id, tag).await?;
    }
    drop(spinner);

    ui.success("Base image tagged successfully");
    for tag in &tags {
        ui.log(format!("Image is tagged as \"{tag}\""));
    }

    if push {
        ui.blank();
        let spinner = ui.spinner("Pushing base image")?;
        for tag in &tags {
            spinner.set_message(format!("Pushing \"{tag}\""));
            spinner.suspend(|| ui.log(format!("Pushing \"{tag}\"")));
            client.push(tag).await?;
        }
        drop(spinner);
        ui.success("Base image pushed");
    } else {
        ui.tip(format!(
            "Publish the tags with `docker push {}`",
            config.image.base_image
        ));
    }

    Ok(NodeOutcome { image_id, tags })
}
