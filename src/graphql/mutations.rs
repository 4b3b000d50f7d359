use async_graphql::{Context, Object};

use crate::{
    app_state::AppState,
    errors::AppResult,
    graphql::extract_claims_from_context,
    models::domain::enrollment::EnrollmentStatus,
    models::domain::Enrollment,
    models::dto::request::{EnrollRequest, LessonCompletionRequest, ReviewRequest},
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn enroll(&self, ctx: &Context<'_>, input: EnrollRequest) -> AppResult<Enrollment> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state.enrollment_service.enroll(&claims, input).await
    }

    async fn record_lesson_completion(
        &self,
        ctx: &Context<'_>,
        enrollment_id: String,
        input: LessonCompletionRequest,
    ) -> AppResult<Enrollment> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .enrollment_service
            .record_lesson_completion(&claims, &enrollment_id, input)
            .await
    }

    async fn issue_certificate(
        &self,
        ctx: &Context<'_>,
        enrollment_id: String,
    ) -> AppResult<Enrollment> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .enrollment_service
            .issue_certificate(&claims, &enrollment_id)
            .await
    }

    async fn set_enrollment_status(
        &self,
        ctx: &Context<'_>,
        enrollment_id: String,
        status: EnrollmentStatus,
    ) -> AppResult<Enrollment> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .enrollment_service
            .set_status(&claims, &enrollment_id, status)
            .await
    }

    async fn add_review(
        &self,
        ctx: &Context<'_>,
        enrollment_id: String,
        input: ReviewRequest,
    ) -> AppResult<Enrollment> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .enrollment_service
            .add_review(&claims, &enrollment_id, input)
            .await
    }
}
