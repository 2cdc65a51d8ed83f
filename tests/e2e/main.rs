//! End-to-end scenarios driving the `skillpack` binary.

mod fixture;

mod lifecycle;
mod oversized_entrypoint;
mod validation_failures;
