// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the GradeTrack academic records service.
//!
//! This crate owns the API contract: request/response DTOs with RFC 3339
//! string dates, handler functions over the policy engine and persistence
//! adapter, and the exhaustive translation of domain, core, and
//! persistence errors into the four-category [`ApiError`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod error;
pub mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use request_response::{
    CountResponse, CreateGradeRequest, DeleteGradeResponse, EndEnrollmentRequest,
    EnrollStudentRequest, EnrollmentCheckResponse, EnrollmentListResponse, EnrollmentResponse,
    GradeExistsResponse, GradeListResponse, GradeResponse, GraduateStudentRequest,
    RemoveEnrollmentResponse, SetGradeActiveResponse, TransferStudentRequest, UpdateGradeRequest,
};
