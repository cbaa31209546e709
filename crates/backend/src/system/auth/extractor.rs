use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

/// Заголовок с именем пользователя, выполняющего операцию
pub const ACTOR_HEADER: &str = "x-actor";

/// Extractor for the acting user name
/// Usage in handlers: `async fn handler(CurrentActor(actor): CurrentActor) -> Response`
pub struct CurrentActor(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| CurrentActor(v.to_string()))
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<CurrentActor, StatusCode> {
        let (mut parts, _) = request.into_parts();
        CurrentActor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_reads_trimmed_actor() {
        let request = Request::builder()
            .header(ACTOR_HEADER, "  ana ")
            .body(())
            .unwrap();
        let CurrentActor(actor) = extract(request).await.unwrap();
        assert_eq!(actor, "ana");
    }

    #[tokio::test]
    async fn test_missing_or_blank_actor_is_unauthorized() {
        let missing = Request::builder().body(()).unwrap();
        assert_eq!(extract(missing).await.err(), Some(StatusCode::UNAUTHORIZED));

        let blank = Request::builder()
            .header(ACTOR_HEADER, "   ")
            .body(())
            .unwrap();
        assert_eq!(extract(blank).await.err(), Some(StatusCode::UNAUTHORIZED));
    }
}
