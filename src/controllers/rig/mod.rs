#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRig;

#[cfg(not(feature = "mock"))]
mod client;
#[cfg(not(feature = "mock"))]
pub use client::RigClient;
