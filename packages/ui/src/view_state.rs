//! Which tab is showing and whether a form covers it.

use store::{Announcement, Course};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Announcements,
    Courses,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Announcements, Tab::Courses, Tab::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Announcements => "Announcements",
            Tab::Courses => "Courses",
            Tab::Settings => "Settings",
        }
    }

    /// Tabs other than the announcement board need a logged-in member.
    pub fn requires_login(self) -> bool {
        !matches!(self, Tab::Announcements)
    }
}

/// Full-screen form overlay. `None` inside a variant means "create new".
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FormView {
    #[default]
    None,
    EditingAnnouncement(Option<Announcement>),
    EditingCourse(Option<Course>),
}

impl FormView {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormView::None)
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormView::None => "",
            FormView::EditingAnnouncement(None) => "New announcement",
            FormView::EditingAnnouncement(Some(_)) => "Edit announcement",
            FormView::EditingCourse(None) => "New course",
            FormView::EditingCourse(Some(_)) => "Edit course",
        }
    }
}

/// What the shell renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Form,
    LoginPrompt,
    Tab(Tab),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    tab: Tab,
    form: FormView,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn form(&self) -> &FormView {
        &self.form
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn new_announcement(&mut self) {
        self.form = FormView::EditingAnnouncement(None);
    }

    pub fn edit_announcement(&mut self, announcement: Announcement) {
        self.form = FormView::EditingAnnouncement(Some(announcement));
    }

    pub fn new_course(&mut self) {
        self.form = FormView::EditingCourse(None);
    }

    pub fn edit_course(&mut self, course: Course) {
        self.form = FormView::EditingCourse(Some(course));
    }

    pub fn close_form(&mut self) {
        self.form = FormView::None;
    }

    /// Drop anything that needs a login and go back to the board.
    pub fn on_logout(&mut self) {
        self.form = FormView::None;
        self.tab = Tab::Announcements;
    }

    /// `loaded` turns true with the first courses snapshot.
    pub fn screen(&self, logged_in: bool, loaded: bool) -> Screen {
        if !loaded {
            Screen::Loading
        } else if self.form.is_open() {
            Screen::Form
        } else if !logged_in && self.tab.requires_login() {
            Screen::LoginPrompt
        } else {
            Screen::Tab(self.tab)
        }
    }
}
