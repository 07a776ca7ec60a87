use std::sync::Arc;

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use domain::{
    entities::receivables::InsertReceivableEntity,
    repositories::{guardians::GuardianRepository, receivables::ReceivableRepository},
    value_objects::{
        enums::{
            payment_methods::PaymentMethod, receivable_origins::ReceivableOrigin,
            receivable_statuses::ReceivableStatus,
        },
        iam::Principal,
        receivables::{
            NewManualReceivable, ReceivableDto, ReceivableQuery, ReceivableSummary,
            ReceivableTotals, ReceivableWithAthlete,
        },
    },
};

use crate::usecases::calendar;

const MAX_INSTALLMENTS: u32 = 12;

#[derive(Debug, Error)]
pub enum ReceivablesError {
    #[error("Not allowed for this role")]
    Unauthorized,

    #[error("Receivable not found")]
    NotFound,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Cannot move a {from} receivable to {to}")]
    InvalidTransition {
        from: ReceivableStatus,
        to: ReceivableStatus,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ReceivablesError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            ReceivablesError::Unauthorized => axum::http::StatusCode::FORBIDDEN,
            ReceivablesError::NotFound => axum::http::StatusCode::NOT_FOUND,
            ReceivablesError::InvalidArgument(_) => axum::http::StatusCode::BAD_REQUEST,
            ReceivablesError::InvalidTransition { .. } => axum::http::StatusCode::CONFLICT,
            ReceivablesError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type ReceivablesResult<T> = Result<T, ReceivablesError>;

pub struct ReceivablesUseCase<R, G>
where
    R: ReceivableRepository + Send + Sync,
    G: GuardianRepository + Send + Sync,
{
    receivable_repository: Arc<R>,
    guardian_repository: Arc<G>,
}

impl<R, G> ReceivablesUseCase<R, G>
where
    R: ReceivableRepository + Send + Sync,
    G: GuardianRepository + Send + Sync,
{
    pub fn new(receivable_repository: Arc<R>, guardian_repository: Arc<G>) -> Self {
        Self {
            receivable_repository,
            guardian_repository,
        }
    }

    /// Role-scoped ledger view. Staff see everything the filter matches;
    /// parents only ever see their own athletes, ignoring the filter.
    pub async fn query(
        &self,
        principal: Principal,
        filter: ReceivableQuery,
    ) -> ReceivablesResult<ReceivableSummary> {
        if principal.role.is_staff() {
            let rows = self.receivable_repository.query_with_athlete(filter).await?;
            let totals = self.receivable_repository.totals_global().await?;
            return Ok(ReceivableSummary {
                items: to_dtos(rows)?,
                totals,
            });
        }

        let athlete_ids = self
            .guardian_repository
            .list_athlete_ids_for_user(principal.user_id)
            .await?;

        if athlete_ids.is_empty() {
            return Ok(ReceivableSummary {
                items: vec![],
                totals: ReceivableTotals::default(),
            });
        }

        let rows = self
            .receivable_repository
            .list_for_athletes(athlete_ids.clone())
            .await?;
        let totals = self
            .receivable_repository
            .totals_for_athletes(athlete_ids)
            .await?;

        Ok(ReceivableSummary {
            items: to_dtos(rows)?,
            totals,
        })
    }

    /// Records a manual charge, optionally split into monthly installments.
    /// `amount_minor` is per installment; each installment's competency is the
    /// first of its due month.
    pub async fn create_manual(
        &self,
        principal: Principal,
        new_receivable: NewManualReceivable,
    ) -> ReceivablesResult<Vec<Uuid>> {
        if !principal.role.is_admin() {
            return Err(ReceivablesError::Unauthorized);
        }

        if new_receivable.amount_minor <= 0 {
            return Err(ReceivablesError::InvalidArgument(
                "Amount must be positive".to_string(),
            ));
        }
        if new_receivable.description.trim().is_empty() {
            return Err(ReceivablesError::InvalidArgument(
                "Description must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_INSTALLMENTS).contains(&new_receivable.installments) {
            return Err(ReceivablesError::InvalidArgument(format!(
                "Installments must be between 1 and {}",
                MAX_INSTALLMENTS
            )));
        }
        let amount_minor = i32::try_from(new_receivable.amount_minor)
            .map_err(|_| ReceivablesError::InvalidArgument("Amount is too large".to_string()))?;

        let mut rows = Vec::with_capacity(new_receivable.installments as usize);

        for i in 0..new_receivable.installments {
            let due_date = calendar::months_after(new_receivable.first_due_date, i)
                .ok_or_else(|| anyhow!("Invalid due date for installment {}", i + 1))?;
            let competency = NaiveDate::from_ymd_opt(due_date.year(), due_date.month(), 1)
                .ok_or_else(|| anyhow!("Invalid competency for installment {}", i + 1))?;

            let description = if new_receivable.installments > 1 {
                format!(
                    "{} ({}/{})",
                    new_receivable.description,
                    i + 1,
                    new_receivable.installments
                )
            } else {
                new_receivable.description.clone()
            };

            rows.push(InsertReceivableEntity {
                athlete_id: new_receivable.athlete_id,
                description,
                competency,
                due_date,
                amount_minor,
                status: ReceivableStatus::Pending.as_str().to_string(),
                payment_method: new_receivable.payment_method.as_str().to_string(),
                origin: ReceivableOrigin::Manual.as_str().to_string(),
            });
        }

        // One repository call so the whole series commits or rolls back
        // together.
        let created = self.receivable_repository.create_many(rows).await?;

        info!(
            user_id = %principal.user_id,
            athlete_id = %new_receivable.athlete_id,
            installments = new_receivable.installments,
            "receivables: manual charge recorded"
        );

        Ok(created)
    }

    /// Moves a receivable along the status machine; `paid_at` is stamped only
    /// when the target is paid.
    pub async fn update_status(
        &self,
        principal: Principal,
        receivable_id: Uuid,
        next: ReceivableStatus,
    ) -> ReceivablesResult<()> {
        if !principal.role.is_admin() {
            return Err(ReceivablesError::Unauthorized);
        }

        let receivable = self
            .receivable_repository
            .find_by_id(receivable_id)
            .await?
            .ok_or(ReceivablesError::NotFound)?;

        let current = ReceivableStatus::from_str(&receivable.status)
            .ok_or_else(|| anyhow!("Receivable {} has unknown status", receivable_id))?;

        if !current.can_transition_to(next) {
            return Err(ReceivablesError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        let paid_at = (next == ReceivableStatus::Paid).then(Utc::now);

        self.receivable_repository
            .set_status(receivable_id, next, paid_at)
            .await?;

        info!(
            user_id = %principal.user_id,
            receivable_id = %receivable_id,
            from = %current,
            to = %next,
            "receivables: status updated"
        );

        Ok(())
    }

    pub async fn mark_paid(
        &self,
        principal: Principal,
        receivable_id: Uuid,
    ) -> ReceivablesResult<()> {
        self.update_status(principal, receivable_id, ReceivableStatus::Paid)
            .await
    }
}

fn to_dtos(rows: Vec<ReceivableWithAthlete>) -> ReceivablesResult<Vec<ReceivableDto>> {
    rows.into_iter()
        .map(|row| {
            let status = ReceivableStatus::from_str(&row.receivable.status)
                .ok_or_else(|| anyhow!("Receivable {} has unknown status", row.receivable.id))?;
            let payment_method = PaymentMethod::from_str(&row.receivable.payment_method)
                .ok_or_else(|| {
                    anyhow!("Receivable {} has unknown payment method", row.receivable.id)
                })?;

            Ok(ReceivableDto {
                id: row.receivable.id,
                athlete_id: row.receivable.athlete_id,
                athlete_name: row.athlete_name,
                description: row.receivable.description,
                competency: row.receivable.competency,
                due_date: row.receivable.due_date,
                amount_minor: row.receivable.amount_minor as i64,
                status,
                payment_method,
                paid_at: row.receivable.paid_at,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use domain::{
        entities::receivables::ReceivableEntity,
        repositories::{
            guardians::MockGuardianRepository, receivables::MockReceivableRepository,
        },
        value_objects::enums::user_roles::UserRole,
    };

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn principal(role: UserRole) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    fn receivable(status: &str) -> ReceivableEntity {
        ReceivableEntity {
            id: Uuid::new_v4(),
            athlete_id: Uuid::new_v4(),
            description: "Monthly Training - 03/2025".to_string(),
            competency: d(2025, 3, 1),
            due_date: d(2025, 3, 10),
            amount_minor: 15_000,
            status: status.to_string(),
            payment_method: "pix".to_string(),
            origin: "auto".to_string(),
            external_payment_ref: None,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    fn usecase(
        receivables: MockReceivableRepository,
        guardians: MockGuardianRepository,
    ) -> ReceivablesUseCase<MockReceivableRepository, MockGuardianRepository> {
        ReceivablesUseCase::new(Arc::new(receivables), Arc::new(guardians))
    }

    #[tokio::test]
    async fn admin_query_sees_global_ledger() {
        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo.expect_query_with_athlete().returning(|_| {
            Box::pin(async move {
                Ok(vec![ReceivableWithAthlete {
                    receivable: receivable("pending"),
                    athlete_name: "Ana Souza".to_string(),
                }])
            })
        });
        receivable_repo.expect_totals_global().returning(|| {
            Box::pin(async move {
                Ok(ReceivableTotals {
                    outstanding_minor: 15_000,
                    collected_minor: 0,
                    delinquent_count: 1,
                })
            })
        });

        let mut guardian_repo = MockGuardianRepository::new();
        guardian_repo.expect_list_athlete_ids_for_user().never();

        let uc = usecase(receivable_repo, guardian_repo);
        let summary = uc
            .query(principal(UserRole::Admin), ReceivableQuery::default())
            .await
            .unwrap();

        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items[0].athlete_name, "Ana Souza");
        assert_eq!(summary.items[0].status, ReceivableStatus::Pending);
        assert_eq!(summary.totals.outstanding_minor, 15_000);
    }

    #[tokio::test]
    async fn parent_query_is_scoped_to_linked_athletes() {
        let athlete_id = Uuid::new_v4();

        let mut guardian_repo = MockGuardianRepository::new();
        guardian_repo
            .expect_list_athlete_ids_for_user()
            .returning(move |_| Box::pin(async move { Ok(vec![athlete_id]) }));

        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo.expect_query_with_athlete().never();
        receivable_repo
            .expect_list_for_athletes()
            .withf(move |ids| ids == &[athlete_id])
            .returning(|_| Box::pin(async move { Ok(vec![]) }));
        receivable_repo
            .expect_totals_for_athletes()
            .withf(move |ids| ids == &[athlete_id])
            .returning(|_| Box::pin(async move { Ok(ReceivableTotals::default()) }));

        let uc = usecase(receivable_repo, guardian_repo);
        let summary = uc
            .query(principal(UserRole::Parent), ReceivableQuery::default())
            .await
            .unwrap();

        assert!(summary.items.is_empty());
    }

    #[tokio::test]
    async fn parent_with_no_links_gets_empty_summary() {
        let mut guardian_repo = MockGuardianRepository::new();
        guardian_repo
            .expect_list_athlete_ids_for_user()
            .returning(|_| Box::pin(async move { Ok(vec![]) }));

        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo.expect_list_for_athletes().never();
        receivable_repo.expect_totals_for_athletes().never();

        let uc = usecase(receivable_repo, guardian_repo);
        let summary = uc
            .query(principal(UserRole::Parent), ReceivableQuery::default())
            .await
            .unwrap();

        assert!(summary.items.is_empty());
        assert_eq!(summary.totals.outstanding_minor, 0);
    }

    #[tokio::test]
    async fn coach_cannot_create_manual_charges() {
        let uc = usecase(MockReceivableRepository::new(), MockGuardianRepository::new());

        let result = uc
            .create_manual(
                principal(UserRole::Coach),
                NewManualReceivable {
                    athlete_id: Uuid::new_v4(),
                    description: "Tournament fee".to_string(),
                    amount_minor: 5_000,
                    first_due_date: d(2025, 4, 10),
                    installments: 1,
                    payment_method: PaymentMethod::Pix,
                },
            )
            .await;

        assert!(matches!(result, Err(ReceivablesError::Unauthorized)));
    }

    #[tokio::test]
    async fn installments_step_months_and_clamp_days() {
        let inserted: Arc<Mutex<Vec<InsertReceivableEntity>>> = Arc::new(Mutex::new(vec![]));
        let sink = inserted.clone();

        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo
            .expect_create_many()
            .times(1)
            .returning(move |rows| {
                let ids = rows.iter().map(|_| Uuid::new_v4()).collect::<Vec<_>>();
                sink.lock().unwrap().extend(rows);
                Box::pin(async move { Ok(ids) })
            });

        let uc = usecase(receivable_repo, MockGuardianRepository::new());
        let ids = uc
            .create_manual(
                principal(UserRole::Admin),
                NewManualReceivable {
                    athlete_id: Uuid::new_v4(),
                    description: "Uniform kit".to_string(),
                    amount_minor: 9_900,
                    first_due_date: d(2025, 1, 31),
                    installments: 3,
                    payment_method: PaymentMethod::Credit,
                },
            )
            .await
            .unwrap();

        assert_eq!(ids.len(), 3);

        let rows = inserted.lock().unwrap();
        assert_eq!(rows[0].due_date, d(2025, 1, 31));
        assert_eq!(rows[1].due_date, d(2025, 2, 28));
        assert_eq!(rows[2].due_date, d(2025, 3, 31));
        assert_eq!(rows[1].competency, d(2025, 2, 1));
        assert_eq!(rows[0].description, "Uniform kit (1/3)");
        assert_eq!(rows[2].description, "Uniform kit (3/3)");
        assert!(rows.iter().all(|r| r.amount_minor == 9_900));
        assert!(rows.iter().all(|r| r.origin == "manual"));
    }

    #[tokio::test]
    async fn failed_installment_series_creates_nothing() {
        // The series goes through a single transactional repository call, so
        // a failure surfaces as an error without any row left behind.
        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo
            .expect_create_many()
            .times(1)
            .withf(|rows| rows.len() == 3)
            .returning(|_| {
                Box::pin(async move { Err(anyhow!("connection reset mid-insert")) })
            });

        let uc = usecase(receivable_repo, MockGuardianRepository::new());
        let result = uc
            .create_manual(
                principal(UserRole::Admin),
                NewManualReceivable {
                    athlete_id: Uuid::new_v4(),
                    description: "Uniform kit".to_string(),
                    amount_minor: 9_900,
                    first_due_date: d(2025, 1, 31),
                    installments: 3,
                    payment_method: PaymentMethod::Credit,
                },
            )
            .await;

        assert!(matches!(result, Err(ReceivablesError::Internal(_))));
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let uc = usecase(MockReceivableRepository::new(), MockGuardianRepository::new());

        let result = uc
            .create_manual(
                principal(UserRole::Admin),
                NewManualReceivable {
                    athlete_id: Uuid::new_v4(),
                    description: "Tournament fee".to_string(),
                    amount_minor: 0,
                    first_due_date: d(2025, 4, 10),
                    installments: 1,
                    payment_method: PaymentMethod::Pix,
                },
            )
            .await;

        assert!(matches!(result, Err(ReceivablesError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn paid_receivable_accepts_no_further_moves() {
        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async move { Ok(Some(receivable("paid"))) }));
        receivable_repo.expect_set_status().never();

        let uc = usecase(receivable_repo, MockGuardianRepository::new());
        let result = uc
            .update_status(
                principal(UserRole::Admin),
                Uuid::new_v4(),
                ReceivableStatus::Canceled,
            )
            .await;

        assert!(matches!(
            result,
            Err(ReceivablesError::InvalidTransition {
                from: ReceivableStatus::Paid,
                to: ReceivableStatus::Canceled,
            })
        ));
    }

    #[tokio::test]
    async fn marking_paid_stamps_paid_at() {
        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async move { Ok(Some(receivable("pending"))) }));
        receivable_repo
            .expect_set_status()
            .withf(|_, status, paid_at| *status == ReceivableStatus::Paid && paid_at.is_some())
            .returning(|_, _, _| Box::pin(async move { Ok(()) }));

        let uc = usecase(receivable_repo, MockGuardianRepository::new());
        uc.mark_paid(principal(UserRole::Admin), Uuid::new_v4())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn canceling_keeps_paid_at_empty() {
        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async move { Ok(Some(receivable("overdue"))) }));
        receivable_repo
            .expect_set_status()
            .withf(|_, status, paid_at| *status == ReceivableStatus::Canceled && paid_at.is_none())
            .returning(|_, _, _| Box::pin(async move { Ok(()) }));

        let uc = usecase(receivable_repo, MockGuardianRepository::new());
        uc.update_status(
            principal(UserRole::Admin),
            Uuid::new_v4(),
            ReceivableStatus::Canceled,
        )
        .await
        .unwrap();
    }
}
