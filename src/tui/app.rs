//! The application loop: main menu dispatch and the add/update/remove/list flows.
//!
//! `App` owns the project store for the whole session. Each flow runs to completion
//! and hands control back to the main menu; leaving the loop, normally or on an
//! input failure, saves the project list one last time.

use std::io;
use std::path::Path;

use ratatui::backend::Backend;
use tracing::{info, warn};

use crate::db::ProjectStore;
use crate::history::TOP_RECENT;
use crate::launcher::Launcher;
use crate::tui::keys::KeySource;
use crate::tui::menu::Selection;
use crate::tui::screen::Screen;

const MAIN_MENU: [&str; 5] = [
    "Add Project",
    "Update Project",
    "Remove Project",
    "List Projects",
    "Exit",
];
const ADD_MODES: [&str; 2] = ["Create new project", "Link an existing directory"];
const PROJECT_ACTIONS: [&str; 4] = [
    "Open in editor",
    "Open in file browser",
    "Copy path to clipboard",
    "Back",
];
const CONFIRM: [&str; 2] = ["No", "Yes"];
const NO_PROJECTS: &str = "  No projects found.";

/// Screens of the application loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    MainMenu,
    AddProject,
    UpdateProject,
    RemoveProject,
    ListProjects,
    Exit,
}

/// A name that `join`s onto the parent as exactly one child directory.
fn is_directory_name(name: &str) -> bool {
    name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Session state: the project store, the external tools and the current screen.
pub struct App<L: Launcher> {
    store: ProjectStore,
    launcher: L,
    state: AppState,
    current_dir: String,
}

impl<L: Launcher> App<L> {
    /// `current_dir` seeds the path chooser's "Use current directory" entry.
    pub fn new(store: ProjectStore, launcher: L, current_dir: &str) -> Self {
        App {
            store,
            launcher,
            state: AppState::MainMenu,
            current_dir: current_dir.to_string(),
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    /// Run until the user exits. The project list is saved however the loop ends.
    pub fn run<B: Backend, K: KeySource>(&mut self, screen: &mut Screen<B, K>) -> io::Result<()> {
        let result = self.event_loop(screen);
        if let Err(e) = self.store.save() {
            warn!(error = %e, "failed to save projects on exit");
        }
        info!(projects = self.store.len(), "session finished");
        result
    }

    fn event_loop<B: Backend, K: KeySource>(&mut self, screen: &mut Screen<B, K>) -> io::Result<()> {
        while self.state != AppState::Exit {
            self.state = self.step(screen)?;
        }
        Ok(())
    }

    fn step<B: Backend, K: KeySource>(&mut self, screen: &mut Screen<B, K>) -> io::Result<AppState> {
        match self.state {
            AppState::MainMenu => self.main_menu(screen),
            AppState::AddProject => self.add_project(screen).map(|_| AppState::MainMenu),
            AppState::UpdateProject => self.update_project(screen).map(|_| AppState::MainMenu),
            AppState::RemoveProject => self.remove_project(screen).map(|_| AppState::MainMenu),
            AppState::ListProjects => self.list_projects(screen).map(|_| AppState::MainMenu),
            AppState::Exit => Ok(AppState::Exit),
        }
    }

    fn main_menu<B: Backend, K: KeySource>(&mut self, screen: &mut Screen<B, K>) -> io::Result<AppState> {
        let selection = screen.choice_menu(&labels(&MAIN_MENU), "Main Menu", "", &['q', 'Q'])?;
        Ok(match selection {
            Selection::Selected(0) => AppState::AddProject,
            Selection::Selected(1) => AppState::UpdateProject,
            Selection::Selected(2) => AppState::RemoveProject,
            Selection::Selected(3) => AppState::ListProjects,
            Selection::Selected(_) | Selection::Terminated(_) => AppState::Exit,
            Selection::Cancelled => AppState::MainMenu,
        })
    }

    /// Let the user pick a project. Returns its ID.
    fn pick_project<B: Backend, K: KeySource>(
        &self,
        screen: &mut Screen<B, K>,
        header: &str,
    ) -> io::Result<Option<usize>> {
        let lines: Vec<String> = self.store.projects().iter().map(|p| p.summary_line()).collect();
        match screen.choice_menu(&lines, header, NO_PROJECTS, &[])? {
            Selection::Selected(idx) => Ok(self.store.projects().get(idx).map(|p| p.id)),
            _ => Ok(None),
        }
    }

    fn recent_paths(&self) -> Vec<String> {
        self.store.history().top(TOP_RECENT)
    }

    fn add_project<B: Backend, K: KeySource>(&mut self, screen: &mut Screen<B, K>) -> io::Result<()> {
        let create = match screen.choice_menu(&labels(&ADD_MODES), "Add Project", "", &[])? {
            Selection::Selected(0) => true,
            Selection::Selected(1) => false,
            _ => return Ok(()),
        };

        let mut header = String::from("Add Project\n");
        let name = loop {
            let Some(name) = screen.read_line(&header, "Name")? else {
                return Ok(());
            };
            let name = name.trim().to_string();
            if !create {
                break name;
            }
            // New directories are named after the project, so the name must be usable and free.
            if name.is_empty() {
                header = String::from("Add Project\nName cannot be empty.\n");
            } else if !is_directory_name(&name) {
                header = String::from("Add Project\nName must be a single folder name, without / or \\.\n");
            } else if !self.store.has_unique_name(&name) {
                header = format!("Add Project\nA project named '{}' already exists.\n", name);
            } else {
                break name;
            }
        };
        header = format!("Add Project\nName: {}\n", name);

        let Some(description) = screen.read_line(&header, "Description")? else {
            return Ok(());
        };
        let description = description.trim().to_string();
        header.push_str(&format!("Description: {}\n", description));

        header.push_str(if create {
            "Choose the parent directory for the new project."
        } else {
            "Enter the absolute path to the project directory or choose an existing one."
        });
        let chosen = screen.choose_path(
            &header,
            &self.current_dir,
            &self.current_dir,
            self.recent_paths(),
        )?;
        if chosen.is_empty() {
            return Ok(());
        }

        if create {
            let project_path = Path::new(&chosen).join(&name).to_string_lossy().into_owned();
            let project = self.store.add(&name, &description, &project_path);
            if !Path::new(&project.path).join(".git").exists() {
                if let Err(e) = self.launcher.init_repository(&project.path) {
                    warn!(path = %project.path, error = %e, "git init failed");
                }
            }
        } else {
            self.store.add(&name, &description, &chosen);
        }
        Ok(())
    }

    fn update_project<B: Backend, K: KeySource>(&mut self, screen: &mut Screen<B, K>) -> io::Result<()> {
        let Some(id) = self.pick_project(screen, "Update which project?")? else {
            return Ok(());
        };
        let Some(current) = self.store.get(id).cloned() else {
            return Ok(());
        };

        let header = format!(
            "{}\nUpdate project fields (leave empty to keep the current value)",
            current.info_block()
        );
        let Some(name) = screen.read_line(&header, "Name")? else {
            return Ok(());
        };
        let Some(description) = screen.read_line(&header, "Description")? else {
            return Ok(());
        };
        // Esc in the chooser keeps the current path.
        let path = screen.choose_path(
            &header,
            &current.path,
            &self.current_dir,
            self.recent_paths(),
        )?;

        self.store.update(id, name.trim(), description.trim(), &path);
        Ok(())
    }

    fn remove_project<B: Backend, K: KeySource>(&mut self, screen: &mut Screen<B, K>) -> io::Result<()> {
        let Some(id) = self.pick_project(screen, "Remove which project?")? else {
            return Ok(());
        };
        let Some(project) = self.store.get(id) else {
            return Ok(());
        };

        let header = format!(
            "{}\nAre you sure you want to remove this project? (y/n)\n\
             This only removes the bookmark, not the directory.",
            project.info_block()
        );
        let confirmed = matches!(
            screen.choice_menu(&labels(&CONFIRM), &header, "", &['y', 'Y', 'n', 'N'])?,
            Selection::Selected(1) | Selection::Terminated('y' | 'Y')
        );
        if confirmed {
            self.store.remove(id);
        }
        Ok(())
    }

    fn list_projects<B: Backend, K: KeySource>(&mut self, screen: &mut Screen<B, K>) -> io::Result<()> {
        let Some(id) = self.pick_project(screen, "Projects:")? else {
            return Ok(());
        };
        let Some(project) = self.store.get(id).cloned() else {
            return Ok(());
        };

        let header = format!("{}\nProject Options", project.info_block());
        let action = screen.choice_menu(&labels(&PROJECT_ACTIONS), &header, "", &['b', 'B'])?;
        let result = match action {
            Selection::Selected(0) => {
                if let Err(e) = self.store.history().record(&project.path) {
                    warn!(path = %project.path, error = %e, "failed to record path history");
                }
                self.launcher.open_in_editor(&project.path)
            }
            Selection::Selected(1) => self.launcher.open_in_file_browser(&project.path),
            Selection::Selected(2) => self.launcher.copy_to_clipboard(&project.path),
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!(path = %project.path, error = %e, "project action failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crossterm::event::KeyCode;
    use tempfile::TempDir;

    use super::*;
    use crate::error::{Error, Result};
    use crate::history::PathHistory;
    use crate::tui::keys::scripted::ScriptedKeys;
    use crate::tui::screen::testing::test_screen;

    #[derive(Default)]
    struct RecordingLauncher {
        calls: Vec<(&'static str, String)>,
        fail: bool,
    }

    impl RecordingLauncher {
        fn log(&mut self, action: &'static str, path: &str) -> Result<()> {
            self.calls.push((action, path.to_string()));
            if self.fail {
                Err(Error::Clipboard("unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl Launcher for RecordingLauncher {
        fn open_in_editor(&mut self, path: &str) -> Result<()> {
            self.log("editor", path)
        }
        fn open_in_file_browser(&mut self, path: &str) -> Result<()> {
            self.log("browser", path)
        }
        fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
            self.log("clipboard", text)
        }
        fn init_repository(&mut self, path: &str) -> Result<()> {
            self.log("git", path)
        }
    }

    fn store_in(dir: &TempDir) -> ProjectStore {
        ProjectStore::load(
            &dir.path().join(".projects.json"),
            PathHistory::new(dir.path().join(".directory_history.json")),
        )
    }

    fn app_in(dir: &TempDir) -> App<RecordingLauncher> {
        let cwd = dir.path().to_string_lossy().into_owned();
        App::new(store_in(dir), RecordingLauncher::default(), &cwd)
    }

    fn seeded_app(dir: &TempDir, names: &[&str]) -> App<RecordingLauncher> {
        let mut app = app_in(dir);
        for name in names {
            let path = dir.path().join(name).to_string_lossy().into_owned();
            app.store.add(name, "seeded", &path);
        }
        app
    }

    fn keys(groups: Vec<Vec<KeyCode>>) -> ScriptedKeys {
        ScriptedKeys::new(groups.into_iter().flatten())
    }

    fn line(text: &str) -> Vec<KeyCode> {
        let mut codes = ScriptedKeys::typed(text);
        codes.push(KeyCode::Enter);
        codes
    }

    #[test]
    fn test_quit_char_exits_and_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let mut screen = test_screen(ScriptedKeys::new([KeyCode::Esc, KeyCode::Char('q')]));

        app.run(&mut screen).unwrap();

        assert_eq!(app.state(), AppState::Exit);
        assert!(dir.path().join(".projects.json").exists());
    }

    #[test]
    fn test_exit_menu_entry() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let mut screen = test_screen(ScriptedKeys::new([KeyCode::Up, KeyCode::Enter]));

        app.run(&mut screen).unwrap();
        assert_eq!(app.state(), AppState::Exit);
    }

    #[test]
    fn test_link_existing_directory() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Enter],                // Add Project
            vec![KeyCode::Down, KeyCode::Enter], // Link
            line("demo"),
            line("a demo"),
            vec![KeyCode::Enter], // accept the current directory
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();

        let projects = app.store().projects();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "demo");
        assert_eq!(projects[0].description, "a demo");
        assert_eq!(projects[0].path, dir.path().to_string_lossy());
        assert!(app.launcher.calls.is_empty());
    }

    #[test]
    fn test_create_new_project_initialises_repository() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Enter], // Add Project
            vec![KeyCode::Enter], // Create
            line("  webapp "),
            line(""),
            vec![KeyCode::Enter],
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();

        let expected = dir.path().join("webapp");
        let project = &app.store().projects()[0];
        assert_eq!(project.name, "webapp");
        assert_eq!(project.path, expected.to_string_lossy());
        assert!(expected.is_dir());
        assert_eq!(app.launcher.calls, vec![("git", project.path.clone())]);
        assert!(app.store().history().top(TOP_RECENT).contains(&project.path));
    }

    #[test]
    fn test_create_rejects_duplicate_name() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, &["api"]);
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Enter, KeyCode::Enter],
            line("API"),
            line("api-v2"),
            line(""),
            vec![KeyCode::Enter],
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();

        let names: Vec<&str> = app.store().projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["api", "api-v2"]);
    }

    #[test]
    fn test_directory_name_rules() {
        assert!(is_directory_name("webapp"));
        assert!(is_directory_name("my.app"));
        assert!(!is_directory_name("/abs"));
        assert!(!is_directory_name("../x"));
        assert!(!is_directory_name("a\\b"));
        assert!(!is_directory_name(".."));
    }

    #[test]
    fn test_create_rejects_names_leaving_the_parent() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Enter, KeyCode::Enter],
            line("../escape"),
            line("/abs"),
            line("inside"),
            line(""),
            vec![KeyCode::Enter],
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();

        let projects = app.store().projects();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].path, dir.path().join("inside").to_string_lossy());
        assert!(!dir.path().parent().unwrap().join("escape").exists());
    }

    #[test]
    fn test_cancel_add_keeps_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Enter, KeyCode::Down, KeyCode::Enter],
            line("demo"),
            line(""),
            vec![KeyCode::Esc], // cancel the path chooser
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_remove_with_confirmation_char() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, &["a", "b", "c"]);
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Down, KeyCode::Down, KeyCode::Enter], // Remove Project
            vec![KeyCode::Down, KeyCode::Enter],                // pick "b"
            vec![KeyCode::Char('y')],
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();

        let reloaded = store_in(&dir);
        let names: Vec<&str> = reloaded.projects().iter().map(|p| p.name.as_str()).collect();
        let ids: Vec<usize> = reloaded.projects().iter().map(|p| p.id).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(ids, vec![0, 1]);
        assert!(dir.path().join("b").is_dir());
    }

    #[test]
    fn test_remove_picks_listed_row_despite_repeated_ids() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".projects.json"),
            r#"[
                {"ID": 0, "Name": "a", "Description": "", "Path": "/a", "TimeStamp": ""},
                {"ID": 0, "Name": "b", "Description": "", "Path": "/b", "TimeStamp": ""}
            ]"#,
        )
        .unwrap();
        let mut app = app_in(&dir);
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Down, KeyCode::Down, KeyCode::Enter],
            vec![KeyCode::Down, KeyCode::Enter], // second row, "b"
            vec![KeyCode::Char('y')],
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();

        let names: Vec<&str> = app.store().projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_remove_declined() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, &["a"]);
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Down, KeyCode::Down, KeyCode::Enter],
            vec![KeyCode::Enter],
            vec![KeyCode::Enter], // "No" is preselected
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();
        assert_eq!(app.store().len(), 1);
    }

    #[test]
    fn test_update_keeps_blank_fields() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, &["api"]);
        let original = app.store().projects()[0].clone();
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Down, KeyCode::Enter], // Update Project
            vec![KeyCode::Enter],
            line(""),
            line("rest service"),
            vec![KeyCode::Esc], // keep the path
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();

        let updated = &app.store().projects()[0];
        assert_eq!(updated.name, "api");
        assert_eq!(updated.description, "rest service");
        assert_eq!(updated.path, original.path);
    }

    #[test]
    fn test_update_current_directory_pick_uses_working_directory() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, &["proj"]);
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Down, KeyCode::Enter],
            vec![KeyCode::Enter],
            line(""),
            line(""),
            vec![KeyCode::Down, KeyCode::Enter], // "Use current directory"
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();

        assert_eq!(app.store().projects()[0].path, dir.path().to_string_lossy());
    }

    #[test]
    fn test_list_open_in_editor_records_history() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, &["a", "b"]);
        fs::remove_file(dir.path().join(".directory_history.json")).unwrap();
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Down, KeyCode::Down, KeyCode::Down, KeyCode::Enter], // List Projects
            vec![KeyCode::Down, KeyCode::Enter],                               // pick "b"
            vec![KeyCode::Enter],                                              // Open in editor
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();

        let path = app.store().projects()[1].path.clone();
        assert_eq!(app.launcher.calls, vec![("editor", path.clone())]);
        assert_eq!(app.store().history().top(TOP_RECENT), vec![path]);
    }

    #[test]
    fn test_failed_action_returns_to_menu() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, &["a"]);
        app.launcher.fail = true;
        let mut screen = test_screen(keys(vec![
            vec![KeyCode::Up, KeyCode::Up, KeyCode::Enter], // List Projects
            vec![KeyCode::Enter],
            vec![KeyCode::Down, KeyCode::Down, KeyCode::Enter], // Copy path
            vec![KeyCode::Char('q')],
        ]));

        app.run(&mut screen).unwrap();

        assert_eq!(app.launcher.calls.len(), 1);
        assert_eq!(app.launcher.calls[0].0, "clipboard");
        assert_eq!(screen.keys().remaining(), 0);
    }

    #[test]
    fn test_input_failure_is_fatal_but_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, &["a"]);
        fs::remove_file(dir.path().join(".projects.json")).unwrap();
        let mut screen = test_screen(ScriptedKeys::new([KeyCode::Down]));

        assert!(app.run(&mut screen).is_err());
        assert_eq!(store_in(&dir).len(), 1);
    }
}
