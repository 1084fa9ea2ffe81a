mod helpers;
mod mocks;

mod agents;
mod checkout;
mod verify;
