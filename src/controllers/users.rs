//! `users` REST resource.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use crate::controller::{ActionResult, Controller, ControllerError};
use crate::front::RequestContext;
use crate::routing::RouteRule;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Thread-safe in-memory user records.
#[derive(Debug, Default)]
pub struct UserStore {
    users: DashMap<u64, User>,
    next_id: AtomicU64,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, name: &str, email: &str) -> User {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User {
            id,
            name: name.to_string(),
            email: email.to_string(),
        };
        self.users.insert(id, user.clone());
        user
    }

    pub fn get(&self, id: u64) -> Option<User> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    /// Apply the given changes; `None` leaves a field untouched.
    pub fn update(&self, id: u64, name: Option<&str>, email: Option<&str>) -> Option<User> {
        let mut entry = self.users.get_mut(&id)?;
        if let Some(name) = name {
            entry.name = name.to_string();
        }
        if let Some(email) = email {
            entry.email = email.to_string();
        }
        Some(entry.clone())
    }

    pub fn remove(&self, id: u64) -> Option<User> {
        self.users.remove(&id).map(|(_, user)| user)
    }

    /// All users ordered by ID.
    pub fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.iter().map(|entry| entry.value().clone()).collect();
        users.sort_by_key(|user| user.id);
        users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

pub struct UsersController {
    action: String,
    route: Arc<RouteRule>,
    users: Arc<UserStore>,
}

/// Serialize a record into a JSON action result.
fn to_json<T: Serialize>(value: &T) -> Result<ActionResult, ControllerError> {
    serde_json::to_value(value)
        .map(ActionResult::json)
        .map_err(|e| ControllerError::Internal(format!("serialization failed: {}", e)))
}

impl UsersController {
    pub fn new(action: String, route: Arc<RouteRule>, users: Arc<UserStore>) -> Self {
        Self { action, route, users }
    }

    fn id(request: &RequestContext) -> Result<u64, ControllerError> {
        let raw = request
            .param("id")
            .ok_or_else(|| ControllerError::BadRequest("missing user id".into()))?;
        raw.parse()
            .map_err(|_| ControllerError::BadRequest(format!("invalid user id '{}'", raw)))
    }

    fn find(&self, request: &RequestContext) -> Result<User, ControllerError> {
        let id = Self::id(request)?;
        self.users
            .get(id)
            .ok_or_else(|| ControllerError::NotFound(format!("user {}", id)))
    }

    fn required<'r>(
        request: &'r RequestContext,
        field: &str,
    ) -> Result<&'r str, ControllerError> {
        request
            .param(field)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ControllerError::BadRequest(format!("'{}' is required", field)))
    }

    fn create(&self, request: &RequestContext) -> Result<ActionResult, ControllerError> {
        let name = Self::required(request, "name")?;
        let email = Self::required(request, "email")?;
        let user = self.users.create(name, email);
        tracing::info!(user_id = user.id, "User created");
        Ok(ActionResult::redirect(format!("/users/{}", user.id)))
    }

    fn update(&self, request: &RequestContext) -> Result<ActionResult, ControllerError> {
        let id = Self::id(request)?;
        let name = request.form.get("name").map(String::as_str);
        let email = request.form.get("email").map(String::as_str);
        let user = self
            .users
            .update(id, name, email)
            .ok_or_else(|| ControllerError::NotFound(format!("user {}", id)))?;
        to_json(&user)
    }

    fn destroy(&self, request: &RequestContext) -> Result<ActionResult, ControllerError> {
        let id = Self::id(request)?;
        self.users
            .remove(id)
            .ok_or_else(|| ControllerError::NotFound(format!("user {}", id)))?;
        Ok(ActionResult::redirect("/users"))
    }
}

impl Controller for UsersController {
    fn action(&self) -> &str {
        &self.action
    }

    fn route(&self) -> &Arc<RouteRule> {
        &self.route
    }

    fn call_action(
        &mut self,
        request: &mut RequestContext,
    ) -> Result<ActionResult, ControllerError> {
        match self.action.as_str() {
            "index" => to_json(&self.users.list()),
            "fresh" => Ok(ActionResult::render(
                "users/fresh",
                concat!(
                    "<form method=\"post\" action=\"/users\">",
                    "<input name=\"name\"><input name=\"email\">",
                    "</form>"
                ),
            )),
            "show" => to_json(&self.find(request)?),
            "edit" => {
                let user = self.find(request)?;
                Ok(ActionResult::render(
                    "users/edit",
                    format!(
                        concat!(
                            "<form method=\"post\" action=\"/users/{id}\">",
                            "<input type=\"hidden\" name=\"_method\" value=\"PUT\">",
                            "<input name=\"name\" value=\"{name}\">",
                            "</form>"
                        ),
                        id = user.id,
                        name = user.name
                    ),
                ))
            }
            "create" => self.create(request),
            "update" => self.update(request),
            "destroy" => self.destroy(request),
            other => Err(ControllerError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Outcome;
    use crate::front::DispatchError;
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use std::collections::HashMap;

    fn call(
        users: &Arc<UserStore>,
        action: &str,
        mut request: RequestContext,
    ) -> Result<ActionResult, ControllerError> {
        let route = Arc::new(RouteRule::new(Method::GET, "/users", "users#index").unwrap());
        UsersController::new(action.to_string(), route, users.clone()).call_action(&mut request)
    }

    fn with_id(method: Method, id: &str) -> RequestContext {
        let mut request = RequestContext::new(method, &format!("/users/{}", id));
        request.route_params.insert("id".into(), id.into());
        request
    }

    #[test]
    fn test_store_assigns_increasing_ids() {
        let store = UserStore::new();
        assert_eq!(store.create("a", "a@x").id, 1);
        assert_eq!(store.create("b", "b@x").id, 2);
        store.remove(1);
        assert_eq!(store.list().iter().map(|u| u.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_create_redirects_to_member() {
        let users = Arc::new(UserStore::new());
        let request = RequestContext::new(Method::POST, "/users")
            .with_form([("name", "Ann"), ("email", "ann@example.com")]);

        let result = call(&users, "create", request).unwrap();
        assert_eq!(result.outcome, Outcome::Redirect { location: "/users/1".into() });
        assert_eq!(users.get(1).unwrap().name, "Ann");
    }

    #[test]
    fn test_create_requires_fields() {
        let users = Arc::new(UserStore::new());
        let request = RequestContext::new(Method::POST, "/users").with_form([("name", "Ann")]);
        let err = call(&users, "create", request).unwrap_err();
        assert!(matches!(err, ControllerError::BadRequest(_)));
        assert!(users.is_empty());
    }

    #[test]
    fn test_show_missing_and_invalid_ids() {
        let users = Arc::new(UserStore::new());
        let err = call(&users, "show", with_id(Method::GET, "9")).unwrap_err();
        assert!(matches!(err, ControllerError::NotFound(_)));

        let err = call(&users, "show", with_id(Method::GET, "")).unwrap_err();
        assert!(matches!(err, ControllerError::BadRequest(_)));
    }

    #[test]
    fn test_update_and_destroy() {
        let users = Arc::new(UserStore::new());
        users.create("Ann", "ann@example.com");

        let request = with_id(Method::PUT, "1").with_form([("name", "Anna")]);
        let result = call(&users, "update", request).unwrap();
        assert_eq!(
            result.outcome,
            Outcome::Json {
                value: json!({ "id": 1, "name": "Anna", "email": "ann@example.com" }),
                status: StatusCode::OK,
            }
        );

        let result = call(&users, "destroy", with_id(Method::DELETE, "1")).unwrap();
        assert_eq!(result.outcome, Outcome::Redirect { location: "/users".into() });
        assert!(users.get(1).is_none());
    }

    #[test]
    fn test_unserializable_value_is_internal_error() {
        // JSON object keys must be strings.
        let value: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        let err = to_json(&value).unwrap_err();
        assert!(matches!(
            err,
            ControllerError::Internal(ref msg) if msg.starts_with("serialization failed")
        ));

        let err = DispatchError::from(err);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
