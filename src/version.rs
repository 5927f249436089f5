pub const GIT_VERSION: &str = env!("GIT_VERSION");
