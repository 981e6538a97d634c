//! Main window composition: title, hidden chrome and the About action.
//! Rendering belongs to the host; this only describes what it should show.

pub const APPLICATION_NAME: &str = "vpaw";
pub const APPLICATION_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toolbar {
    Main,
    ModuleSelector,
    Module,
    View,
    MouseMode,
    Capture,
    Viewers,
    Dialog,
}

impl Toolbar {
    pub const ALL: [Toolbar; 8] = [
        Toolbar::Main,
        Toolbar::ModuleSelector,
        Toolbar::Module,
        Toolbar::View,
        Toolbar::MouseMode,
        Toolbar::Capture,
        Toolbar::Viewers,
        Toolbar::Dialog,
    ];
}

/// Help-menu entry that opens the About dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AboutAction {
    pub object_name: String,
    pub text: String,
    pub logo: &'static str,
}

#[derive(Clone, Debug)]
pub struct WindowChrome {
    pub title: String,
    pub icon: &'static str,
    pub panel_logo: &'static str,
    pub hidden_toolbars: Vec<Toolbar>,
    pub data_probe_collapsed: bool,
    pub data_probe_visible: bool,
    pub status_bar_visible: bool,
    pub about: AboutAction,
}

impl WindowChrome {
    /// Stock layout: every toolbar but the module selector hidden, data
    /// probe and status bar out of the way.
    pub fn vpaw() -> Self {
        Self {
            title: window_title(APPLICATION_NAME, APPLICATION_VERSION),
            icon: ":/Icons/Medium/DesktopIcon.png",
            panel_logo: ":/LogoFull.png",
            hidden_toolbars: Toolbar::ALL
                .into_iter()
                .filter(|t| *t != Toolbar::ModuleSelector)
                .collect(),
            data_probe_collapsed: true,
            data_probe_visible: false,
            status_bar_visible: false,
            about: AboutAction {
                object_name: format!("HelpAbout{APPLICATION_NAME}AppAction"),
                text: format!("About {APPLICATION_NAME}"),
                logo: ":/Logo.png",
            },
        }
    }

    #[inline]
    pub fn is_toolbar_visible(&self, toolbar: Toolbar) -> bool {
        !self.hidden_toolbars.contains(&toolbar)
    }

    pub fn log_summary(&self) {
        log::info!("Window: '{}'", self.title);
        log::debug!(
            "Hidden toolbars: {:?}; data probe visible={}, status bar visible={}",
            self.hidden_toolbars,
            self.data_probe_visible,
            self.status_bar_visible
        );
        log::debug!("Help menu action '{}' ({})", self.about.text, self.about.object_name);
    }
}

pub fn window_title(name: &str, version: &str) -> String {
    format!("{name} {version}")
}
