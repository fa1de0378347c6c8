//! 사용자(Identity) 도메인 모델.
//!
//! 이 모듈은 인증 대상인 사용자 레코드 타입을 정의합니다:
//! - `User` - 영속화된 사용자 레코드 (자격증명 해시 포함)
//! - `UserSummary` - 응답에 노출되는 공개 필드

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 영속화된 사용자 레코드.
///
/// 생성 시점 이후 불변이며, 저장소의 `create`만이 유일한 작성자입니다.
/// `password_hash`는 PHC 형식의 Argon2id 해시로, 응답에 절대 노출되지 않습니다.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct User {
    /// 사용자 ID
    pub id: i64,
    /// 사용자 이름 (고유)
    pub username: String,
    /// 자격증명 해시 (PHC 형식)
    pub password_hash: String,
    /// 생성 타임스탬프
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 공개 필드만 포함하는 요약을 반환합니다.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

/// 외부로 노출되는 사용자 요약.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// 사용자 ID
    pub id: i64,
    /// 사용자 이름
    pub username: String,
    /// 생성 타임스탬프
    pub created_at: DateTime<Utc>,
}
