//! Domain layer: card input, payment method tokens, subscriptions, the
//! workflow state machine and the ports its collaborators implement.

pub mod card;
pub mod payment_method;
pub mod ports;
pub mod replacement;
pub mod state;
pub mod subscription;
pub mod view;
