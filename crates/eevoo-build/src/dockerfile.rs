/// Which flavor of app image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockerfileTemplate {
    /// Production dependencies only, starts the app with `npm start`.
    Production,
    /// All dependencies, defaults to `npm test`. Used to run the test suite.
    Development,
}

/// Renders app Dockerfiles on top of the shared Node.js base image.
pub struct DockerfileGenerator<'a> {
    /// Full base image reference, e.g. `kthse/nodejs-echo:12`
    base_image: &'a str,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(base_image: &'a str) -> Self {
        Self { base_image }
    }

    pub fn render(&self, template: DockerfileTemplate) -> String {
        match template {
            DockerfileTemplate::Production => format!(
                r#"FROM {base}

WORKDIR /usr/src/app
ENV NODE_ENV=production

COPY package.json package-lock.json* ./
RUN npm install --production --no-audit && npm cache clean --force

COPY . .

EXPOSE 3000
CMD ["npm", "start"]
"#,
                base = self.base_image,
            ),
            DockerfileTemplate::Development => format!(
                r#"FROM {base}

WORKDIR /usr/src/app

COPY package.json package-lock.json* ./
RUN npm install --no-audit

COPY . .

CMD ["npm", "test"]
"#,
                base = self.base_image,
            ),
        }
    }
}

/// Renders the shared Node.js base image from the upstream `node` image.
pub struct BaseImageDockerfile<'a> {
    node_image: &'a str,
    node_version: &'a str,
}

impl<'a> BaseImageDockerfile<'a> {
    pub fn new(node_image: &'a str, node_version: &'a str) -> Self {
        Self {
            node_image,
            node_version,
        }
    }

    pub fn render(&self) -> String {
        format!(
            r#"FROM {image}:{version}-alpine

RUN apk add --no-cache tini

WORKDIR /usr/src/app

ENTRYPOINT ["/sbin/tini", "--"]
"#,
            image = self.node_image,
            version = self.node_version,
        )
    }
}
