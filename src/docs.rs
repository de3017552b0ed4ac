use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::addresses::model::{
    Address, CreateAddressDto, GeocodeResponse, RouteResponse, UpdateAddressDto,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest,
};
use crate::modules::courses::model::{
    Course, CourseDetails, CourseStatus, CreateCourseDto, DeclareCourseDto, ScheduleCourseDto,
    UpdateCourseDto,
};
use crate::modules::enseignants::model::{
    CreateEnseignantDto, Enseignant, EnseignantDetails, EnseignantSummary, UpdateEnseignantDto,
};
use crate::modules::familles::model::{Famille, FamilleDetails, FamilleSummary, UpdateFamilleDto};
use crate::modules::health::controller::HealthResponse;
use crate::modules::missions::model::{
    CreateMissionDto, ExtendMissionDto, Mission, MissionDetails, MissionStatus, UpdateMissionDto,
};
use crate::modules::offers::model::{
    CreateOfferDto, Offer, OfferDetails, OfferStatus, UpdateOfferDto,
};
use crate::modules::options::model::{
    CreateOptionDto, OptionStatus, TeachingOption, UpdateOptionDto,
};
use crate::modules::payments::model::{
    CreatePaymentDto, Invoice, Payment, PaymentStats, PaymentStatus, PaymentType,
};
use crate::modules::reports::model::{
    CreateReportDto, Report, ReportStatus, ReviewReportDto, UpdateReportDto,
};
use crate::modules::resources::model::{
    CreateResourceDto, Resource, ResourceType, ShareResourceDto, UpdateResourceDto,
};
use crate::modules::users::model::{
    Administrator, ChangePasswordDto, Profile, UpdateProfileDto, UpdateUserDto, User,
    UserResponse, UserRole,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::get_profile,
        crate::modules::auth::controller::update_profile,
        crate::modules::auth::controller::change_password,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::get_user_addresses,
        crate::modules::users::controller::get_user_payments,
        crate::modules::users::controller::get_user_resources,
        crate::modules::familles::controller::get_familles,
        crate::modules::familles::controller::get_famille,
        crate::modules::familles::controller::update_famille,
        crate::modules::familles::controller::delete_famille,
        crate::modules::familles::controller::get_famille_teachers,
        crate::modules::familles::controller::get_famille_missions,
        crate::modules::familles::controller::get_famille_courses,
        crate::modules::familles::controller::get_famille_options,
        crate::modules::familles::controller::get_famille_payments,
        crate::modules::familles::controller::create_famille_review,
        crate::modules::enseignants::controller::get_enseignants,
        crate::modules::enseignants::controller::create_enseignant,
        crate::modules::enseignants::controller::get_nearby_enseignants,
        crate::modules::enseignants::controller::get_enseignant,
        crate::modules::enseignants::controller::update_enseignant,
        crate::modules::enseignants::controller::delete_enseignant,
        crate::modules::enseignants::controller::get_enseignant_students,
        crate::modules::enseignants::controller::get_enseignant_missions,
        crate::modules::enseignants::controller::get_enseignant_courses,
        crate::modules::enseignants::controller::get_enseignant_reports,
        crate::modules::enseignants::controller::get_enseignant_options,
        crate::modules::enseignants::controller::get_enseignant_payments,
        crate::modules::missions::controller::get_missions,
        crate::modules::missions::controller::create_mission,
        crate::modules::missions::controller::get_mission,
        crate::modules::missions::controller::update_mission,
        crate::modules::missions::controller::delete_mission,
        crate::modules::missions::controller::stop_mission,
        crate::modules::missions::controller::extend_mission,
        crate::modules::missions::controller::get_mission_courses,
        crate::modules::missions::controller::get_mission_reports,
        crate::modules::missions::controller::get_mission_payments,
        crate::modules::missions::controller::get_family_missions,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::schedule_course,
        crate::modules::courses::controller::cancel_course,
        crate::modules::courses::controller::complete_course,
        crate::modules::courses::controller::declare_course,
        crate::modules::courses::controller::get_course_payments,
        crate::modules::courses::controller::get_teacher_courses,
        crate::modules::offers::controller::get_offers,
        crate::modules::offers::controller::search_offers,
        crate::modules::offers::controller::get_active_offers,
        crate::modules::offers::controller::create_offer,
        crate::modules::offers::controller::get_offer,
        crate::modules::offers::controller::update_offer,
        crate::modules::offers::controller::delete_offer,
        crate::modules::offers::controller::publish_offer,
        crate::modules::offers::controller::close_offer,
        crate::modules::offers::controller::fill_offer,
        crate::modules::offers::controller::apply_to_offer,
        crate::modules::offers::controller::get_offer_options,
        crate::modules::offers::controller::get_offer_applicants,
        crate::modules::options::controller::get_options,
        crate::modules::options::controller::get_pending_options,
        crate::modules::options::controller::get_expiring_options,
        crate::modules::options::controller::create_option,
        crate::modules::options::controller::get_option,
        crate::modules::options::controller::update_option,
        crate::modules::options::controller::delete_option,
        crate::modules::options::controller::accept_option,
        crate::modules::options::controller::decline_option,
        crate::modules::options::controller::cancel_option,
        crate::modules::options::controller::reject_option,
        crate::modules::options::controller::expire_option,
        crate::modules::payments::controller::get_payments,
        crate::modules::payments::controller::get_payment_stats,
        crate::modules::payments::controller::create_payment,
        crate::modules::payments::controller::get_payment,
        crate::modules::payments::controller::delete_payment,
        crate::modules::payments::controller::process_payment,
        crate::modules::payments::controller::fail_payment,
        crate::modules::payments::controller::refund_payment,
        crate::modules::payments::controller::get_invoice,
        crate::modules::reports::controller::get_reports,
        crate::modules::reports::controller::create_report,
        crate::modules::reports::controller::get_report,
        crate::modules::reports::controller::update_report,
        crate::modules::reports::controller::delete_report,
        crate::modules::reports::controller::submit_report,
        crate::modules::reports::controller::validate_report,
        crate::modules::reports::controller::reject_report,
        crate::modules::addresses::controller::get_addresses,
        crate::modules::addresses::controller::create_address,
        crate::modules::addresses::controller::geocode,
        crate::modules::addresses::controller::calculate_route,
        crate::modules::addresses::controller::get_address,
        crate::modules::addresses::controller::update_address,
        crate::modules::addresses::controller::delete_address,
        crate::modules::resources::controller::get_resources,
        crate::modules::resources::controller::create_resource,
        crate::modules::resources::controller::get_resource,
        crate::modules::resources::controller::update_resource,
        crate::modules::resources::controller::delete_resource,
        crate::modules::resources::controller::share_resource,
        crate::modules::resources::controller::unshare_resource
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            User,
            UserRole,
            UserResponse,
            Profile,
            Famille,
            Enseignant,
            Administrator,
            UpdateUserDto,
            UpdateProfileDto,
            ChangePasswordDto,
            FamilleSummary,
            FamilleDetails,
            UpdateFamilleDto,
            EnseignantSummary,
            EnseignantDetails,
            CreateEnseignantDto,
            UpdateEnseignantDto,
            Mission,
            MissionStatus,
            MissionDetails,
            CreateMissionDto,
            UpdateMissionDto,
            ExtendMissionDto,
            Course,
            CourseStatus,
            CourseDetails,
            CreateCourseDto,
            UpdateCourseDto,
            ScheduleCourseDto,
            DeclareCourseDto,
            Offer,
            OfferStatus,
            OfferDetails,
            CreateOfferDto,
            UpdateOfferDto,
            TeachingOption,
            OptionStatus,
            CreateOptionDto,
            UpdateOptionDto,
            Payment,
            PaymentStatus,
            PaymentType,
            PaymentStats,
            Invoice,
            CreatePaymentDto,
            Report,
            ReportStatus,
            CreateReportDto,
            UpdateReportDto,
            ReviewReportDto,
            Address,
            CreateAddressDto,
            UpdateAddressDto,
            GeocodeResponse,
            RouteResponse,
            Resource,
            ResourceType,
            CreateResourceDto,
            UpdateResourceDto,
            ShareResourceDto
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Profile", description = "The authenticated user's own account"),
        (name = "Users", description = "User management endpoints"),
        (name = "Familles", description = "Family accounts and their engagements"),
        (name = "Enseignants", description = "Teacher accounts and their engagements"),
        (name = "Missions", description = "Family/teacher engagements"),
        (name = "Courses", description = "Sessions within a mission"),
        (name = "Offers", description = "Job postings published by administrators"),
        (name = "Options", description = "Time-limited teacher reservations"),
        (name = "Payments", description = "Payment bookkeeping and invoices"),
        (name = "Reports", description = "Teacher reports and administrator review"),
        (name = "Addresses", description = "User addresses and geo lookups"),
        (name = "Resources", description = "Educational material and sharing")
    ),
    info(
        title = "Edumarket API",
        version = "0.1.0",
        description = "REST API of a tutoring marketplace connecting families with teachers, built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_core_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/v1/auth/login",
            "/api/v1/missions/{id}/extend",
            "/api/v1/options/{id}/decline",
            "/api/v1/payments/{id}/invoice",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_openapi_registers_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
