pub mod client;
pub mod config;
pub mod format;
pub mod types;

pub use client::PedagioClient;
pub use config::Credentials;
pub use format::{format_brl, render_result};
pub use types::{QueryResponse, TokenResponse, TollQuery, TollVoucher, cnpj};
