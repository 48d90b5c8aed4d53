//! Identity hoops.

use salvo::prelude::*;
use storefront_app::domain::members::records::MemberUuid;
use uuid::Uuid;

use crate::{
    auth::{ADMIN_ROLE, MEMBER_HEADER, ROLE_HEADER},
    extensions::*,
};

/// Require a member id and make it available to handlers.
#[salvo::handler]
pub(crate) async fn member(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(member_uuid) = req
        .header::<String>(MEMBER_HEADER)
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
    else {
        res.render(StatusError::unauthorized().brief("Missing or invalid x-user-uuid header"));
        ctrl.skip_rest();

        return;
    };

    depot.insert_member_uuid(MemberUuid::from_uuid(member_uuid));

    ctrl.call_next(req, depot, res).await;
}

/// Require the admin role.
#[salvo::handler]
pub(crate) async fn admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let is_admin = req
        .header::<String>(ROLE_HEADER)
        .is_some_and(|role| role.trim().eq_ignore_ascii_case(ADMIN_ROLE));

    if !is_admin {
        res.render(StatusError::forbidden().brief("Admin role required"));
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    #[salvo::handler]
    async fn echo_member(depot: &mut Depot, res: &mut Response) {
        let member_uuid = depot
            .member_uuid_or_401()
            .map_or_else(|_| "missing".to_string(), |uuid| uuid.to_string());

        res.render(member_uuid);
    }

    fn member_service() -> Service {
        Service::new(Router::new().hoop(member).push(Router::new().get(echo_member)))
    }

    fn admin_service() -> Service {
        Service::new(Router::new().hoop(admin).push(Router::new().get(echo_member)))
    }

    #[tokio::test]
    async fn missing_member_header_returns_401() {
        let res = TestClient::get("http://example.com")
            .send(&member_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn malformed_member_header_returns_401() {
        let res = TestClient::get("http://example.com")
            .add_header(MEMBER_HEADER, "not-a-uuid", true)
            .send(&member_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn valid_member_header_is_injected() -> TestResult {
        let member_uuid = Uuid::now_v7();

        let mut res = TestClient::get("http://example.com")
            .add_header(MEMBER_HEADER, member_uuid.to_string(), true)
            .send(&member_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, member_uuid.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn non_admin_role_returns_403() {
        let res = TestClient::get("http://example.com")
            .add_header(ROLE_HEADER, "customer", true)
            .send(&admin_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn admin_role_passes() {
        let res = TestClient::get("http://example.com")
            .add_header(ROLE_HEADER, "admin", true)
            .send(&admin_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }
}
