use std::sync::Arc;

use crate::controller::{ActionResult, Controller, ControllerError};
use crate::front::RequestContext;
use crate::routing::RouteRule;

use super::UserStore;

pub struct HomeController {
    action: String,
    route: Arc<RouteRule>,
    users: Arc<UserStore>,
}

impl HomeController {
    pub fn new(action: String, route: Arc<RouteRule>, users: Arc<UserStore>) -> Self {
        Self { action, route, users }
    }

    fn index(&self, request: &mut RequestContext) -> ActionResult {
        let visits = request
            .session
            .get("visits")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        request.session.insert("visits".into(), visits.to_string());

        ActionResult::render(
            "home/index",
            format!(
                "<h1>Welcome</h1><p>{} users registered, visit {}</p>",
                self.users.len(),
                visits
            ),
        )
    }

    fn export(&self) -> ActionResult {
        let mut csv = String::from("id,name,email\n");
        for user in self.users.list() {
            csv.push_str(&format!("{},{},{}\n", user.id, user.name, user.email));
        }
        ActionResult::download("users.csv", "text/csv", csv.into_bytes())
    }
}

impl Controller for HomeController {
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
            "index" => Ok(self.index(request)),
            "export" => Ok(self.export()),
            "legacy" => Ok(ActionResult::redirect("/")),
            other => Err(ControllerError::UnknownAction(other.to_string())),
        }
    }
}
