mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod confirm_dialog;
pub use confirm_dialog::{ConfirmDialog, DialogField};

mod app_shell;
pub use app_shell::{use_view_state, AppShell};

mod form_frame;
pub use form_frame::FormFrame;

mod login_prompt;
pub use login_prompt::LoginPrompt;

mod news_tab;
pub use news_tab::NewsTab;

mod courses_tab;
pub use courses_tab::CoursesTab;

mod settings_tab;
pub use settings_tab::SettingsTab;

mod announcement_form;
pub use announcement_form::AnnouncementForm;

mod course_form;
pub use course_form::CourseForm;
