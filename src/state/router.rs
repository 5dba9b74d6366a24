use log::debug;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Home,
    Stadiums,
    StadiumDetail,
    Map,
    Matches,
    MatchDetail,
    Profile,
    Help,
}

/// Pages reachable from the navigation bar, in display order.
pub const NAV_PAGES: [Page; 5] = [Page::Home, Page::Stadiums, Page::Map, Page::Matches, Page::Profile];

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Stadiums => "Stadiums",
            Page::StadiumDetail => "Stadium",
            Page::Map => "Map",
            Page::Matches => "Matches",
            Page::MatchDetail => "Match",
            Page::Profile => "Profile",
            Page::Help => "Help",
        }
    }

    /// The navigation entry highlighted while this page is active.
    pub fn nav_index(&self) -> Option<usize> {
        let anchor = match self {
            Page::StadiumDetail => Page::Stadiums,
            Page::MatchDetail => Page::Matches,
            Page::Help => return None,
            other => *other,
        };
        NAV_PAGES.iter().position(|p| *p == anchor)
    }
}

/// Work that must wait until the freshly activated page has been laid out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeferredInit {
    Map,
    ProfileForm,
}

/// Page stack. Plain LIFO history; there is no deep linking.
#[derive(Debug, Default)]
pub struct Router {
    current: Page,
    history: Vec<Page>,
    nav_highlight: Option<usize>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: Page::Home,
            history: Vec::new(),
            nav_highlight: Page::Home.nav_index(),
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn history(&self) -> &[Page] {
        &self.history
    }

    pub fn nav_highlight(&self) -> Option<usize> {
        self.nav_highlight
    }

    /// Activate `page`, recording the previous one unless suppressed or
    /// unchanged. Returns the deferred initialization the caller must
    /// schedule once the page has settled.
    pub fn navigate_to(&mut self, page: Page, push_history: bool) -> Option<DeferredInit> {
        if push_history && page != self.current {
            self.history.push(self.current);
        }
        debug!("navigate {:?} -> {page:?}", self.current);
        self.current = page;
        self.nav_highlight = page.nav_index();

        match page {
            Page::Map => Some(DeferredInit::Map),
            Page::Profile => Some(DeferredInit::ProfileForm),
            _ => None,
        }
    }

    /// Pop the history stack, or fall back to Home when it is empty.
    pub fn go_back(&mut self) -> Option<DeferredInit> {
        let target = self.history.pop().unwrap_or(Page::Home);
        self.navigate_to(target, false)
    }
}
