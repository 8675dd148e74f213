/// Which screen the application is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Role selection.
    #[default]
    Home,
    /// Secret code entry before the dashboard.
    TutorLogin,
    /// Tutor edits and activates the live test.
    TutorDashboard,
    /// Student waits for, or starts, the live test.
    StudentPortal,
    /// A timed attempt is running.
    StudentTest,
    /// Score and answer review of the last attempt.
    StudentResults,
}

/// Events that move the application between screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ChooseTutor,
    ChooseStudent,
    LoginAccepted,
    StartTest,
    TestSubmitted,
    GoHome,
}

impl AppState {
    /// Next screen for `route`. Routes that make no sense on the current
    /// screen leave it unchanged; the test screen is only reachable when a
    /// live test exists.
    pub fn next(self, route: Route, has_live_test: bool) -> AppState {
        use AppState::*;

        match (self, route) {
            // An attempt can only end by submission.
            (StudentTest, Route::TestSubmitted) => StudentResults,
            (StudentTest, _) => StudentTest,

            (_, Route::GoHome) => Home,

            (Home, Route::ChooseTutor) => TutorLogin,
            (Home, Route::ChooseStudent) => StudentPortal,
            (TutorLogin, Route::LoginAccepted) => TutorDashboard,
            (StudentPortal, Route::StartTest) if has_live_test => StudentTest,

            (state, _) => state,
        }
    }

    pub fn is_tutor_screen(self) -> bool {
        matches!(self, AppState::TutorLogin | AppState::TutorDashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_flow() {
        let state = AppState::Home.next(Route::ChooseStudent, true);
        assert_eq!(state, AppState::StudentPortal);

        let state = state.next(Route::StartTest, true);
        assert_eq!(state, AppState::StudentTest);

        let state = state.next(Route::TestSubmitted, true);
        assert_eq!(state, AppState::StudentResults);

        assert_eq!(state.next(Route::GoHome, true), AppState::Home);
    }

    #[test]
    fn test_start_requires_live_test() {
        assert_eq!(
            AppState::StudentPortal.next(Route::StartTest, false),
            AppState::StudentPortal
        );
        assert_eq!(AppState::Home.next(Route::StartTest, true), AppState::Home);
    }

    #[test]
    fn test_tutor_flow() {
        let state = AppState::Home.next(Route::ChooseTutor, false);
        assert_eq!(state, AppState::TutorLogin);
        assert!(state.is_tutor_screen());

        let state = state.next(Route::LoginAccepted, false);
        assert_eq!(state, AppState::TutorDashboard);

        assert_eq!(
            AppState::Home.next(Route::LoginAccepted, false),
            AppState::Home
        );
    }

    #[test]
    fn test_running_test_ignores_other_routes() {
        for route in [
            Route::ChooseTutor,
            Route::ChooseStudent,
            Route::LoginAccepted,
            Route::StartTest,
            Route::GoHome,
        ] {
            assert_eq!(AppState::StudentTest.next(route, true), AppState::StudentTest);
        }
    }
}
