//! User Repository
//!
//! 사용자 레코드 관련 데이터베이스 연산을 담당합니다.
//! 영속 저장소를 만지는 유일한 컴포넌트입니다.

use auth_core::User;
use sqlx::PgPool;

/// 저장소 연산 에러.
///
/// `NotFound`/`Conflict`는 정상적인 비즈니스 결과이고,
/// `Database`는 인프라 장애입니다. 호출자는 이 둘을 구분하여
/// 응답 코드를 결정해야 합니다.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("레코드를 찾을 수 없습니다")]
    NotFound,
    #[error("username이 이미 존재합니다")]
    Conflict,
    #[error("데이터베이스 에러: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique_violation
                if db_err.code().as_deref() == Some("23505") {
                    RepositoryError::Conflict
                } else {
                    RepositoryError::Database(err)
                }
            }
            _ => RepositoryError::Database(err),
        }
    }
}

/// 사용자 저장소.
///
/// 모든 연산은 호출자의 데드라인/취소 범위 안에서 실행되며,
/// 연결 풀이 물리 연결을 직렬화하므로 호출자 측 락이 필요 없습니다.
pub struct UserRepository;

impl UserRepository {
    /// ID로 사용자 조회.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(user)
    }

    /// username으로 사용자 조회.
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(user)
    }

    /// 사용자 생성.
    ///
    /// username 고유 제약 위반은 `Conflict`로 매핑됩니다.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
             RETURNING id, username, password_hash, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: RepositoryError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn test_pool_timeout_maps_to_database() {
        let err: RepositoryError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
