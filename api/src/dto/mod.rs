//! Request and response bodies of the HTTP API

pub mod auth;

pub use auth::{
    DeliveryStatus, LoginRequest, LoginResponse, SendOtpRequest, SendOtpResponse, SignupRequest,
    SignupResponse, VerifyOtpRequest, VerifyOtpResponse,
};
