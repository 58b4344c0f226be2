pub mod arguments;
pub mod captcha;
pub mod config;
pub mod errors; // Error taxonomy shared by every module
pub mod logger;
pub mod paths;
pub mod proxy;
pub mod runner;
pub mod scheduler;
pub mod session;
pub mod wallet;
