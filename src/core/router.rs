use crate::domain::model::{Destination, NavigationState};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub destination: Destination,
    pub title: String,
    pub body: String,
}

pub type RenderCallback = Box<dyn Fn() -> PageContent + Send + Sync>;

/// 將導覽選項對應到頁面的 render callback
///
/// Every destination always has a callback, so `resolve` never comes back
/// empty. A selection that matches no label resolves to the last destination
/// (`Contact`).
pub struct PageRouter {
    routes: HashMap<Destination, RenderCallback>,
}

impl PageRouter {
    pub const FALLBACK: Destination = Destination::Contact;

    pub fn new() -> Self {
        let mut router = Self {
            routes: HashMap::new(),
        };
        for destination in Destination::ALL {
            router = router.route(destination, move || default_page(destination));
        }
        router
    }

    /// 覆寫某個目的地的 callback
    pub fn route<F>(mut self, destination: Destination, render: F) -> Self
    where
        F: Fn() -> PageContent + Send + Sync + 'static,
    {
        self.routes.insert(destination, Box::new(render));
        self
    }

    pub fn destination_for(&self, selection: &str) -> Destination {
        Destination::from_label(selection).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown page selection '{}', falling back to {}",
                selection,
                Self::FALLBACK.label()
            );
            Self::FALLBACK
        })
    }

    pub fn resolve(&self, selection: &str) -> &RenderCallback {
        let destination = self.destination_for(selection);
        &self.routes[&destination]
    }

    pub fn render(&self, state: &NavigationState) -> PageContent {
        (self.resolve(&state.selection))()
    }
}

impl Default for PageRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn default_page(destination: Destination) -> PageContent {
    let body = match destination {
        Destination::Home => "This is the home page.",
        Destination::About => "This page is about this application.",
        Destination::Contact => "Please contact us at email@example.com",
    };
    PageContent {
        destination,
        title: destination.label().to_string(),
        body: body.to_string(),
    }
}
