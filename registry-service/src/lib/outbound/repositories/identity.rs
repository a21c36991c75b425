use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::PersonName;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::IdentityError;

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: i64,
    name: String,
    surname: String,
    email_address: String,
    password: String,
    role: Option<String>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = IdentityError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, reason: String| {
            IdentityError::DatabaseError(format!(
                "corrupt {} in users row {}: {}",
                field, row.id, reason
            ))
        };

        let role = row
            .role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .map_err(|e| corrupt("role", e.to_string()))?;

        Ok(Identity {
            id: IdentityId(row.id),
            name: PersonName::new(row.name.clone()).map_err(|e| corrupt("name", e.to_string()))?,
            surname: PersonName::new(row.surname.clone())
                .map_err(|e| corrupt("surname", e.to_string()))?,
            email: EmailAddress::new(row.email_address.clone())
                .map_err(|e| corrupt("email_address", e.to_string()))?,
            password_hash: row.password,
            role,
        })
    }
}

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, name, surname, email_address, password, role
            FROM users
            WHERE email_address = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, name, surname, email_address, password, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            INSERT INTO users (name, surname, email_address, password, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, surname, email_address, password, role
            "#,
        )
        .bind(identity.name.as_str())
        .bind(identity.surname.as_str())
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .bind(identity.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("users_email_address_key")
                {
                    return IdentityError::EmailAlreadyExists(identity.email.as_str().to_string());
                }
            }
            IdentityError::DatabaseError(e.to_string())
        })?;

        Identity::try_from(row)
    }
}
