use crate::error::{AppError, Result};
use reqwest::{Client, Response, Url};
use std::time::Duration;

use super::notification_dto::UpdateNotificationRequest;
use super::notification_models::Notification;

/// Client for the marketplace backend's notification endpoints.
#[derive(Clone)]
pub struct NotificationRepository {
    client: Client,
    base_url: Url,
}

impl NotificationRepository {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid API_URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("API_URL {} cannot be a base URL", base_url)));
        }

        Ok(Self { client, base_url })
    }

    /// History for `viewer_id`, in the backend's order (oldest first).
    pub async fn find_all_by_viewer(&self, viewer_id: &str) -> Result<Vec<Notification>> {
        let url = self.endpoint(&["api", "notification", validate_path_segment(viewer_id)?])?;
        let response = self.client.get(url).send().await?;
        let notifications = check_status(response)?.json().await?;

        Ok(notifications)
    }

    pub async fn delete(&self, id: &str, viewer_id: &str) -> Result<()> {
        let url = self.endpoint(&[
            "api",
            "notification",
            "delete",
            validate_path_segment(id)?,
            validate_path_segment(viewer_id)?,
        ])?;
        let response = self.client.delete(url).send().await?;
        check_status(response)?;

        Ok(())
    }

    pub async fn mark_as_read(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["api", "notification", "update"])?;
        let body = UpdateNotificationRequest {
            notify_id: id.to_string(),
            read: true,
        };
        let response = self.client.patch(url).json(&body).send().await?;
        check_status(response)?;

        Ok(())
    }

    /// Append `segments` to the base URL. Each segment is percent-encoded,
    /// so `/`, `?` and `#` inside an id stay within that segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("API_URL {} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

/// Ids travel as single upstream path segments; empty, `.` and `..` would
/// resolve to a different path.
pub fn validate_path_segment(value: &str) -> Result<&str> {
    match value {
        "" | "." | ".." => Err(AppError::BadRequest(format!(
            "'{}' is not a valid identifier",
            value
        ))),
        _ => Ok(value),
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::UpstreamStatus(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn repository(server: &Server) -> NotificationRepository {
        NotificationRepository::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetches_history_in_backend_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/notification/viewer-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {
                        "id": "a",
                        "receiverId": "viewer-1",
                        "title": "New booking",
                        "description": "Portrait session",
                        "createdAt": "2024-05-01T10:00:00Z",
                        "read": true
                    },
                    {
                        "id": "b",
                        "receiverId": "viewer-1",
                        "title": "Payment received",
                        "description": "Deposit paid",
                        "createdAt": "2024-05-02T10:00:00Z",
                        "read": false
                    }
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let notifications = repository(&server)
            .find_all_by_viewer("viewer-1")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].id, "a");
        assert_eq!(notifications[1].receiver_id, "viewer-1");
        assert!(!notifications[1].read);
    }

    #[tokio::test]
    async fn history_error_status_is_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/notification/viewer-1")
            .with_status(500)
            .create_async()
            .await;

        let result = repository(&server).find_all_by_viewer("viewer-1").await;
        assert!(matches!(result, Err(AppError::UpstreamStatus(500))));
    }

    #[tokio::test]
    async fn delete_is_scoped_to_viewer() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/notification/delete/n-1/viewer-1")
            .with_status(200)
            .create_async()
            .await;

        repository(&server).delete("n-1", "viewer-1").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn mark_as_read_sends_notify_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/api/notification/update")
            .match_body(Matcher::Json(json!({ "notifyId": "n-1", "read": true })))
            .with_status(200)
            .create_async()
            .await;

        repository(&server).mark_as_read("n-1").await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn trailing_slash_and_base_path_are_kept_tidy() {
        let repo = NotificationRepository::new("http://localhost:4000/", Duration::from_secs(1))
            .unwrap();
        let url = repo.endpoint(&["api", "notification", "viewer"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/notification/viewer");

        let repo = NotificationRepository::new("http://localhost:4000/backend/", Duration::from_secs(1))
            .unwrap();
        let url = repo.endpoint(&["api", "notification", "viewer"]).unwrap();
        assert_eq!(url.path(), "/backend/api/notification/viewer");
    }

    #[test]
    fn ids_are_encoded_as_single_segments() {
        let repo = NotificationRepository::new("http://localhost:4000", Duration::from_secs(1))
            .unwrap();

        let url = repo
            .endpoint(&["api", "notification", "delete", "x/../../other-viewer", "viewer"])
            .unwrap();
        assert_eq!(
            url.path(),
            "/api/notification/delete/x%2F..%2F..%2Fother-viewer/viewer"
        );

        let url = repo.endpoint(&["api", "notification", "a?admin=1#frag"]).unwrap();
        assert_eq!(url.path(), "/api/notification/a%3Fadmin=1%23frag");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn dot_segments_are_rejected() {
        assert!(matches!(validate_path_segment(".."), Err(AppError::BadRequest(_))));
        assert!(matches!(validate_path_segment("."), Err(AppError::BadRequest(_))));
        assert!(matches!(validate_path_segment(""), Err(AppError::BadRequest(_))));
        assert_eq!(validate_path_segment("..hidden").unwrap(), "..hidden");
    }

    #[tokio::test]
    async fn delete_with_traversal_id_stays_in_its_segment() {
        let mut server = Server::new_async().await;
        let scoped = server
            .mock("DELETE", "/api/notification/delete/x%2F..%2F..%2Fother-viewer/viewer")
            .with_status(200)
            .create_async()
            .await;
        let escaped = server
            .mock("DELETE", "/api/notification/other-viewer/viewer")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        repository(&server)
            .delete("x/../../other-viewer", "viewer")
            .await
            .unwrap();

        scoped.assert_async().await;
        escaped.assert_async().await;
    }

    #[tokio::test]
    async fn delete_with_dot_dot_id_never_reaches_backend() {
        let mut server = Server::new_async().await;
        let any = server
            .mock("DELETE", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let result = repository(&server).delete("..", "viewer").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        any.assert_async().await;
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let result = NotificationRepository::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
