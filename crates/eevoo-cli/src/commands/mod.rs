mod app;
mod node;

#[cfg(test)]
mod mock;

pub use app::app;
pub use node::node;
