use czp_bridge_engine::traits::{
    GatewayError,
    GovGateway,
    PushRequest,
    TokenSource,
    UpsertOutcome,
    UserMirror,
    UserMirrorError,
};
use czp_common::{AccessToken, UserProfile};
use mockall::mock;
use serde_json::Value;

mock! {
    pub Gateway {}

    impl TokenSource for Gateway {
        async fn fetch_access_token(&self) -> Result<AccessToken, GatewayError>;
    }

    impl GovGateway for Gateway {
        async fn exchange_mobile_token(&self, access: &AccessToken, app_id: &str, m_token: &str) -> Result<UserProfile, GatewayError>;
        async fn push_notification(&self, access: &AccessToken, request: PushRequest) -> Result<Value, GatewayError>;
    }
}

mock! {
    pub Mirror {}

    impl UserMirror for Mirror {
        async fn upsert_user(&self, profile: &UserProfile) -> Result<UpsertOutcome, UserMirrorError>;
    }
}
