//! Membership purchase orchestration.
//!
//! The crate drives a purchase from plan selection through phone-OTP
//! identity verification, customer resolution, invoice creation and the
//! signed payment-gateway handoff, then reconciles the gateway's redirect
//! back into a terminal outcome. Rendering is left entirely to the
//! embedding UI layer, which switches on [`flow::PurchaseStage`].

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod flow;
pub mod service;
pub mod state;
pub mod storage;
pub mod utils;


pub use config::{build_config, AppConfig};
pub use error::{FlowError, FlowResult};
pub use flow::{PurchaseOrchestrator, PurchaseStage};
pub use state::AppState;

pub fn init_logger() {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    let _ = pretty_env_logger::try_init_timed();
}
