use async_graphql::{Context, Object};

use crate::{
    app_state::AppState,
    errors::AppResult,
    graphql::{extract_claims_from_context, maybe_claims_from_context},
    models::domain::{Category, Course, Enrollment, Quiz},
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Published course by slug; owners and admins also see drafts.
    async fn course(&self, ctx: &Context<'_>, slug: String) -> AppResult<Course> {
        let state = ctx.data::<AppState>()?;
        let claims = maybe_claims_from_context(ctx);

        state
            .course_service
            .get_course_by_slug(claims.as_ref(), &slug)
            .await
    }

    async fn courses(
        &self,
        ctx: &Context<'_>,
        category_id: Option<String>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<Vec<Course>> {
        let state = ctx.data::<AppState>()?;
        let claims = maybe_claims_from_context(ctx);

        let offset = offset.unwrap_or(0).max(0);
        let limit = limit.unwrap_or(20).clamp(1, 100);

        let page = state
            .course_service
            .list_courses(claims.as_ref(), category_id.as_deref(), offset, limit)
            .await?;
        Ok(page.items)
    }

    async fn categories(&self, ctx: &Context<'_>) -> AppResult<Vec<Category>> {
        let state = ctx.data::<AppState>()?;
        state.category_service.list_categories().await
    }

    async fn my_enrollments(&self, ctx: &Context<'_>) -> AppResult<Vec<Enrollment>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state.enrollment_service.my_enrollments(&claims).await
    }

    async fn enrollment(&self, ctx: &Context<'_>, id: String) -> AppResult<Enrollment> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state.enrollment_service.get_enrollment(&claims, &id).await
    }

    async fn quiz(&self, ctx: &Context<'_>, id: String) -> AppResult<Quiz> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state.quiz_service.get_quiz(&claims, &id).await
    }
}
