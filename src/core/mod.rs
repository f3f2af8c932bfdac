//! Core business logic module
//!
//! This module contains the card processing components:
//! - `traits` - Trait abstractions for interchangeable storage and gateways
//! - `card_service` - Orchestration of load, save, validate and charge
//! - `validator` - Expiry and Luhn checks
//! - `charge` - Simulated, timeout-bounded charging

pub mod card_service;
pub mod charge;
pub mod traits;
pub mod validator;

pub use card_service::CardService;
pub use charge::{ChargeConfig, ChargeService, SimulatedGateway};
pub use traits::{CardStore, ChargeGateway, SaveOutcome};
