//! Application layer orchestrating the payment method replacement.
//!
//! `PaymentMethodReplacementWorkflow` drives one replacement attempt at a time
//! against injected collaborators; `UpdatePaymentMethodPage` wires it to the
//! subscription list it refreshes on success.

pub mod page;
pub mod workflow;
