use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use domain::{
    repositories::{
        athletes::AthleteRepository, guardians::GuardianRepository,
        receivables::ReceivableRepository,
    },
    value_objects::{collection::CollectionLink, iam::Principal},
};

use infra::payments::pix_client::{PixCharge, PixClient, ProviderError};

/// Seam over the payment provider so the workflow can be exercised without
/// network access.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait PixGateway: Send + Sync {
    async fn create_pix_charge(
        &self,
        amount_minor: i64,
        description: &str,
    ) -> Result<PixCharge, ProviderError>;
}

#[async_trait]
impl PixGateway for PixClient {
    async fn create_pix_charge(
        &self,
        amount_minor: i64,
        description: &str,
    ) -> Result<PixCharge, ProviderError> {
        PixClient::create_pix_charge(self, amount_minor, description).await
    }
}

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Not allowed for this role")]
    Unauthorized,

    #[error("Athlete not found")]
    AthleteNotFound,

    #[error("Athlete has no outstanding balance")]
    NoOutstandingBalance,

    #[error("No valid guardian phone on file")]
    NoValidPhone,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CollectionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            CollectionError::Unauthorized => axum::http::StatusCode::FORBIDDEN,
            CollectionError::AthleteNotFound | CollectionError::NoOutstandingBalance => {
                axum::http::StatusCode::NOT_FOUND
            }
            CollectionError::NoValidPhone => axum::http::StatusCode::UNPROCESSABLE_ENTITY,
            CollectionError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type CollectionResult<T> = Result<T, CollectionError>;

#[derive(Debug, Clone)]
pub struct CollectionSettings {
    pub whatsapp_base_url: String,
    pub country_code: String,
}

/// Builds a chat deep link that asks a guardian to settle an athlete's open
/// receivables. The PIX charge is best effort; a provider failure degrades the
/// message rather than failing the request.
pub struct CollectionUseCase<R, A, G, Px>
where
    R: ReceivableRepository + Send + Sync,
    A: AthleteRepository + Send + Sync,
    G: GuardianRepository + Send + Sync,
    Px: PixGateway,
{
    receivable_repository: Arc<R>,
    athlete_repository: Arc<A>,
    guardian_repository: Arc<G>,
    pix_gateway: Arc<Px>,
    settings: CollectionSettings,
}

impl<R, A, G, Px> CollectionUseCase<R, A, G, Px>
where
    R: ReceivableRepository + Send + Sync,
    A: AthleteRepository + Send + Sync,
    G: GuardianRepository + Send + Sync,
    Px: PixGateway,
{
    pub fn new(
        receivable_repository: Arc<R>,
        athlete_repository: Arc<A>,
        guardian_repository: Arc<G>,
        pix_gateway: Arc<Px>,
        settings: CollectionSettings,
    ) -> Self {
        Self {
            receivable_repository,
            athlete_repository,
            guardian_repository,
            pix_gateway,
            settings,
        }
    }

    pub async fn build_collection_link(
        &self,
        principal: Principal,
        athlete_id: Uuid,
    ) -> CollectionResult<CollectionLink> {
        if !principal.role.is_admin() {
            return Err(CollectionError::Unauthorized);
        }

        let athlete = self
            .athlete_repository
            .find_by_id(athlete_id)
            .await?
            .ok_or(CollectionError::AthleteNotFound)?;

        let open = self
            .receivable_repository
            .list_delinquent_for_athlete(athlete_id)
            .await?;
        if open.is_empty() {
            return Err(CollectionError::NoOutstandingBalance);
        }

        // Resolve the phone before touching the provider; a charge without a
        // destination is useless.
        let guardian = self
            .guardian_repository
            .find_for_athlete(athlete_id)
            .await?;
        let phone = guardian
            .as_ref()
            .and_then(|g| g.phone.as_deref())
            .and_then(normalize_phone)
            .ok_or(CollectionError::NoValidPhone)?;

        let total_minor: i64 = open.iter().map(|r| r.amount_minor as i64).sum();

        // The repository returns rows ordered by due date, so competencies
        // arrive in chronological order with duplicates adjacent.
        let mut months: Vec<String> = open
            .iter()
            .map(|r| r.competency.format("%m/%Y").to_string())
            .collect();
        months.dedup();

        let charge_description = format!("Open receivables for {}", athlete.name);
        let payment_url = match self
            .pix_gateway
            .create_pix_charge(total_minor, &charge_description)
            .await
        {
            Ok(charge) => Some(charge.payment_url),
            Err(err) => {
                warn!(
                    athlete_id = %athlete_id,
                    provider_error = %err,
                    "collection: pix charge failed, sending message without payment link"
                );
                None
            }
        };

        let message = compose_message(&athlete.name, &months, total_minor, payment_url.as_deref());

        let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
        let redirect_url = format!(
            "{}/{}{}?text={}",
            self.settings.whatsapp_base_url.trim_end_matches('/'),
            self.settings.country_code,
            phone,
            encoded
        );

        info!(
            user_id = %principal.user_id,
            athlete_id = %athlete_id,
            total_minor,
            receivables = open.len(),
            "collection: link built"
        );

        Ok(CollectionLink {
            redirect_url,
            message,
            total_minor,
            months,
            payment_url,
        })
    }
}

/// Keeps digits only and trims to the trailing 11, dropping country prefixes.
/// Anything shorter than 10 digits is not a dialable number.
fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 {
        return None;
    }

    let keep = digits.len().min(11);
    Some(digits[digits.len() - keep..].to_string())
}

fn compose_message(
    athlete_name: &str,
    months: &[String],
    total_minor: i64,
    payment_url: Option<&str>,
) -> String {
    let mut message = format!(
        "Hello! We noticed open payments for {} covering {}. Total due: R$ {}.{:02}.",
        athlete_name,
        months.join(", "),
        total_minor / 100,
        total_minor % 100
    );

    if let Some(url) = payment_url {
        message.push_str(&format!(" Pay via PIX: {}", url));
    }

    message.push_str(" Please disregard this message if you have already paid.");
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use domain::{
        entities::{athletes::AthleteEntity, guardians::GuardianEntity,
            receivables::ReceivableEntity},
        repositories::{
            athletes::MockAthleteRepository, guardians::MockGuardianRepository,
            receivables::MockReceivableRepository,
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

    fn athlete(id: Uuid) -> AthleteEntity {
        AthleteEntity {
            id,
            name: "Ana Souza".to_string(),
            birth_date: d(2012, 5, 20),
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }

    fn guardian(athlete_phone: &str) -> GuardianEntity {
        GuardianEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Carla Souza".to_string(),
            phone: Some(athlete_phone.to_string()),
            created_at: Utc::now(),
        }
    }

    fn open_receivable(athlete_id: Uuid, amount_minor: i32, competency: NaiveDate) -> ReceivableEntity {
        ReceivableEntity {
            id: Uuid::new_v4(),
            athlete_id,
            description: "Monthly Training".to_string(),
            competency,
            due_date: competency,
            amount_minor,
            status: "overdue".to_string(),
            payment_method: "pix".to_string(),
            origin: "auto".to_string(),
            external_payment_ref: None,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    fn settings() -> CollectionSettings {
        CollectionSettings {
            whatsapp_base_url: "https://wa.me".to_string(),
            country_code: "55".to_string(),
        }
    }

    fn usecase(
        receivables: MockReceivableRepository,
        athletes: MockAthleteRepository,
        guardians: MockGuardianRepository,
        pix: MockPixGateway,
    ) -> CollectionUseCase<
        MockReceivableRepository,
        MockAthleteRepository,
        MockGuardianRepository,
        MockPixGateway,
    > {
        CollectionUseCase::new(
            Arc::new(receivables),
            Arc::new(athletes),
            Arc::new(guardians),
            Arc::new(pix),
            settings(),
        )
    }

    #[tokio::test]
    async fn builds_link_with_totals_months_and_payment_url() {
        let athlete_id = Uuid::new_v4();

        let mut athlete_repo = MockAthleteRepository::new();
        athlete_repo
            .expect_find_by_id()
            .returning(move |id| Box::pin(async move { Ok(Some(athlete(id))) }));

        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo
            .expect_list_delinquent_for_athlete()
            .returning(move |id| {
                Box::pin(async move {
                    Ok(vec![
                        open_receivable(id, 10_000, d(2025, 1, 1)),
                        open_receivable(id, 15_000, d(2025, 2, 1)),
                    ])
                })
            });

        let mut guardian_repo = MockGuardianRepository::new();
        guardian_repo
            .expect_find_for_athlete()
            .returning(|_| Box::pin(async move { Ok(Some(guardian("11987654321"))) }));

        let mut pix = MockPixGateway::new();
        pix.expect_create_pix_charge()
            .withf(|amount, _| *amount == 25_000)
            .returning(|_, _| {
                Box::pin(async move {
                    Ok(PixCharge {
                        payment_url: "https://pay.example/abc".to_string(),
                        qr_code_text: "pix-code".to_string(),
                        qr_code_image: None,
                    })
                })
            });

        let uc = usecase(receivable_repo, athlete_repo, guardian_repo, pix);
        let link = uc
            .build_collection_link(principal(UserRole::Admin), athlete_id)
            .await
            .unwrap();

        assert_eq!(link.total_minor, 25_000);
        assert_eq!(link.months, vec!["01/2025", "02/2025"]);
        assert_eq!(link.payment_url.as_deref(), Some("https://pay.example/abc"));
        assert!(link.redirect_url.starts_with("https://wa.me/5511987654321?text="));
        assert!(link.message.contains("R$ 250.00"));
        assert!(link.message.contains("01/2025, 02/2025"));
        assert!(link.message.contains("https://pay.example/abc"));
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_message_without_payment_link() {
        let athlete_id = Uuid::new_v4();

        let mut athlete_repo = MockAthleteRepository::new();
        athlete_repo
            .expect_find_by_id()
            .returning(move |id| Box::pin(async move { Ok(Some(athlete(id))) }));

        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo
            .expect_list_delinquent_for_athlete()
            .returning(move |id| {
                Box::pin(async move { Ok(vec![open_receivable(id, 10_000, d(2025, 1, 1))]) })
            });

        let mut guardian_repo = MockGuardianRepository::new();
        guardian_repo
            .expect_find_for_athlete()
            .returning(|_| Box::pin(async move { Ok(Some(guardian("11987654321"))) }));

        let mut pix = MockPixGateway::new();
        pix.expect_create_pix_charge()
            .returning(|_, _| {
                Box::pin(async move { Err(ProviderError::Provider { status: 503 }) })
            });

        let uc = usecase(receivable_repo, athlete_repo, guardian_repo, pix);
        let link = uc
            .build_collection_link(principal(UserRole::Admin), athlete_id)
            .await
            .unwrap();

        assert_eq!(link.payment_url, None);
        assert!(!link.message.contains("PIX:"));
        assert!(link.redirect_url.contains("5511987654321"));
    }

    #[tokio::test]
    async fn settled_athlete_yields_no_outstanding_balance() {
        let mut athlete_repo = MockAthleteRepository::new();
        athlete_repo
            .expect_find_by_id()
            .returning(move |id| Box::pin(async move { Ok(Some(athlete(id))) }));

        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo
            .expect_list_delinquent_for_athlete()
            .returning(|_| Box::pin(async move { Ok(vec![]) }));

        let mut pix = MockPixGateway::new();
        pix.expect_create_pix_charge().never();

        let uc = usecase(
            receivable_repo,
            athlete_repo,
            MockGuardianRepository::new(),
            pix,
        );
        let result = uc
            .build_collection_link(principal(UserRole::Admin), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(CollectionError::NoOutstandingBalance)));
    }

    #[tokio::test]
    async fn short_phone_is_rejected_before_charging() {
        let athlete_id = Uuid::new_v4();

        let mut athlete_repo = MockAthleteRepository::new();
        athlete_repo
            .expect_find_by_id()
            .returning(move |id| Box::pin(async move { Ok(Some(athlete(id))) }));

        let mut receivable_repo = MockReceivableRepository::new();
        receivable_repo
            .expect_list_delinquent_for_athlete()
            .returning(move |id| {
                Box::pin(async move { Ok(vec![open_receivable(id, 10_000, d(2025, 1, 1))]) })
            });

        let mut guardian_repo = MockGuardianRepository::new();
        guardian_repo
            .expect_find_for_athlete()
            .returning(|_| Box::pin(async move { Ok(Some(guardian("12345"))) }));

        let mut pix = MockPixGateway::new();
        pix.expect_create_pix_charge().never();

        let uc = usecase(receivable_repo, athlete_repo, guardian_repo, pix);
        let result = uc
            .build_collection_link(principal(UserRole::Admin), athlete_id)
            .await;

        assert!(matches!(result, Err(CollectionError::NoValidPhone)));
    }

    #[tokio::test]
    async fn coach_cannot_trigger_collection() {
        let uc = usecase(
            MockReceivableRepository::new(),
            MockAthleteRepository::new(),
            MockGuardianRepository::new(),
            MockPixGateway::new(),
        );

        let result = uc
            .build_collection_link(principal(UserRole::Coach), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(CollectionError::Unauthorized)));
    }

    #[test]
    fn phone_normalization_strips_formatting_and_country_code() {
        assert_eq!(
            normalize_phone("+55 (11) 98765-4321").as_deref(),
            Some("11987654321")
        );
        assert_eq!(normalize_phone("11987654321").as_deref(), Some("11987654321"));
        assert_eq!(normalize_phone("1187654321").as_deref(), Some("1187654321"));
        assert_eq!(normalize_phone("98765"), None);
        assert_eq!(normalize_phone("not a phone"), None);
    }
}
