use std::sync::Arc;

use anyhow::anyhow;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use domain::{
    entities::plans::{InsertPlanEntity, PlanEntity, UpdatePlanEntity},
    repositories::plans::PlanRepository,
    value_objects::{
        enums::billing_periods::BillingPeriod,
        enums::payment_methods::PaymentMethod,
        iam::Principal,
        plans::{NewPlan, PlanDto},
    },
};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Not allowed for this role")]
    Unauthorized,

    #[error("Plan not found")]
    NotFound,

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlanError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            PlanError::Unauthorized => axum::http::StatusCode::FORBIDDEN,
            PlanError::NotFound => axum::http::StatusCode::NOT_FOUND,
            PlanError::InvalidArgument(_) => axum::http::StatusCode::BAD_REQUEST,
            PlanError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;

pub struct PlanUseCase<P>
where
    P: PlanRepository + Send + Sync,
{
    plan_repository: Arc<P>,
}

impl<P> PlanUseCase<P>
where
    P: PlanRepository + Send + Sync,
{
    pub fn new(plan_repository: Arc<P>) -> Self {
        Self { plan_repository }
    }

    pub async fn list(&self, principal: Principal) -> PlanResult<Vec<PlanDto>> {
        if !principal.role.is_staff() {
            return Err(PlanError::Unauthorized);
        }

        let plans = self.plan_repository.list_plans().await?;
        plans.into_iter().map(to_dto).collect()
    }

    pub async fn create(&self, principal: Principal, new_plan: NewPlan) -> PlanResult<Uuid> {
        if !principal.role.is_admin() {
            return Err(PlanError::Unauthorized);
        }
        validate(&new_plan)?;

        let plan_id = self
            .plan_repository
            .create_plan(InsertPlanEntity {
                name: new_plan.name.trim().to_string(),
                amount_minor: to_amount(new_plan.amount_minor)?,
                due_day: new_plan.due_day,
                default_payment_method: new_plan.default_payment_method.as_str().to_string(),
                billing_period: new_plan.billing_period.as_str().to_string(),
                description: new_plan.description,
                is_active: new_plan.is_active,
            })
            .await?;

        info!(user_id = %principal.user_id, plan_id = %plan_id, "plans: created");
        Ok(plan_id)
    }

    pub async fn update(
        &self,
        principal: Principal,
        plan_id: Uuid,
        new_plan: NewPlan,
    ) -> PlanResult<()> {
        if !principal.role.is_admin() {
            return Err(PlanError::Unauthorized);
        }
        validate(&new_plan)?;

        self.plan_repository
            .find_by_id(plan_id)
            .await?
            .ok_or(PlanError::NotFound)?;

        self.plan_repository
            .update_plan(
                plan_id,
                UpdatePlanEntity {
                    name: new_plan.name.trim().to_string(),
                    amount_minor: to_amount(new_plan.amount_minor)?,
                    due_day: new_plan.due_day,
                    default_payment_method: new_plan.default_payment_method.as_str().to_string(),
                    billing_period: new_plan.billing_period.as_str().to_string(),
                    description: new_plan.description,
                    is_active: new_plan.is_active,
                },
            )
            .await?;

        info!(user_id = %principal.user_id, plan_id = %plan_id, "plans: updated");
        Ok(())
    }
}

fn validate(plan: &NewPlan) -> PlanResult<()> {
    if plan.name.trim().is_empty() {
        return Err(PlanError::InvalidArgument(
            "Plan name must not be empty".to_string(),
        ));
    }
    if !(1..=31).contains(&plan.due_day) {
        return Err(PlanError::InvalidArgument(
            "Due day must be between 1 and 31".to_string(),
        ));
    }
    if plan.amount_minor < 0 {
        return Err(PlanError::InvalidArgument(
            "Amount must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn to_amount(amount_minor: i64) -> PlanResult<i32> {
    i32::try_from(amount_minor)
        .map_err(|_| PlanError::InvalidArgument("Amount is too large".to_string()))
}

fn to_dto(plan: PlanEntity) -> PlanResult<PlanDto> {
    let default_payment_method = PaymentMethod::from_str(&plan.default_payment_method)
        .ok_or_else(|| anyhow!("Plan {} has unknown payment method", plan.id))?;
    let billing_period = BillingPeriod::from_str(&plan.billing_period)
        .ok_or_else(|| anyhow!("Plan {} has unknown billing period", plan.id))?;

    Ok(PlanDto {
        id: plan.id,
        name: plan.name,
        amount_minor: plan.amount_minor as i64,
        due_day: plan.due_day,
        default_payment_method,
        billing_period,
        description: plan.description,
        is_active: plan.is_active,
    })
}
