//! Dashboard HTML, rendered with minijinja from templates embedded at compile time.

use minijinja::Environment;
use serde::Serialize;

use crate::error::ServerError;

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../templates/base.html"))?;
        env.add_template("login.html", include_str!("../templates/login.html"))?;
        env.add_template("dashboard.html", include_str!("../templates/dashboard.html"))?;
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, ServerError> {
        Ok(self.env.get_template(name)?.render(ctx)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use minijinja::context;

    #[test]
    fn login_escapes_user_input() {
        let views = Views::new().unwrap();
        let html = views
            .render("login.html", context! { username => "<script>", error => "Invalid username or password" })
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Invalid username or password"));
    }

    #[test]
    fn dashboard_without_selection_lists_sources() {
        let views = Views::new().unwrap();
        let html = views
            .render(
                "dashboard.html",
                context! { operator => "admin", employee_ids => vec!["e1", "e2"], selected_employee_id => None::<String>, activities => Vec::<String>::new() },
            )
            .unwrap();
        assert!(html.contains("employee_id=e1"));
        assert!(!html.contains("Recent activity"));
    }
}
