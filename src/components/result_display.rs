//! Chooses what the result area shows for a given [`ViewState`].

use crate::models::Profile;
use crate::state::{ViewError, ViewState};

/// Populated card contents, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub handle: String,
    pub avatar_url: String,
    pub biography: Option<String>,
    pub repos_label: String,
    pub profile_url: String,
}

impl From<&Profile> for Card {
    fn from(profile: &Profile) -> Self {
        Card {
            title: profile.title().to_string(),
            handle: profile.handle.clone(),
            avatar_url: profile.avatar_url.clone(),
            biography: profile.biography.clone().filter(|b| !b.is_empty()),
            repos_label: format!("{} repos públicos", profile.public_repo_count),
            profile_url: profile.profile_url.clone(),
        }
    }
}

/// The one view the result area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    /// Nothing searched yet.
    Idle,
    Loading,
    EmptyInput,
    NotFound,
    GenericError,
    Populated(Card),
}

impl CardView {
    /// Selects the view for `state`. Loading hides everything else.
    pub fn from_state(state: &ViewState) -> Self {
        if state.loading {
            return CardView::Loading;
        }
        match (state.error, &state.user) {
            (Some(ViewError::EmptyInput), _) => CardView::EmptyInput,
            (Some(ViewError::NotFound), _) => CardView::NotFound,
            (Some(ViewError::GenericError), _) => CardView::GenericError,
            (None, Some(profile)) => CardView::Populated(Card::from(profile)),
            (None, None) => CardView::Idle,
        }
    }

    /// Status line shown with this view.
    pub fn message(&self) -> &'static str {
        match self {
            CardView::Idle => "Busca un usuario de GitHub para comenzar.",
            CardView::Loading => "Buscando usuario...",
            CardView::EmptyInput => "Ingresa un nombre de usuario para iniciar la búsqueda.",
            CardView::NotFound => {
                "No encontramos ese usuario de GitHub. Revisa el nombre e inténtalo de nuevo."
            }
            CardView::GenericError => {
                "Ocurrió un error al consultar la API de GitHub. Intenta más tarde."
            }
            CardView::Populated(_) => "Datos obtenidos en tiempo real desde la GitHub Public API.",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CardView::NotFound | CardView::GenericError)
    }

    pub fn card(&self) -> Option<&Card> {
        match self {
            CardView::Populated(card) => Some(card),
            _ => None,
        }
    }
}

/// Result area. Only remembers what it rendered last.
#[derive(Debug, Clone)]
pub struct ResultDisplay {
    last: ViewState,
    view: CardView,
}

impl Default for ResultDisplay {
    fn default() -> Self {
        Self {
            last: ViewState::default(),
            view: CardView::Idle,
        }
    }
}

impl ResultDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `state`, returning the selected view.
    pub fn render(&mut self, state: &ViewState) -> &CardView {
        if *state != self.last {
            self.view = CardView::from_state(state);
            self.last = state.clone();
        }
        &self.view
    }

    pub fn view(&self) -> &CardView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marcos() -> Profile {
        Profile {
            handle: "TheMaff".into(),
            display_name: Some("Marcos".into()),
            avatar_url: "http://avatar".into(),
            biography: Some("Frontend dev".into()),
            public_repo_count: 42,
            profile_url: "http://github.com/TheMaff".into(),
        }
    }

    fn state(user: Option<Profile>, loading: bool, error: Option<ViewError>) -> ViewState {
        ViewState {
            user,
            loading,
            error,
        }
    }

    #[test]
    fn populated_card_shows_name_repo_count_and_link() {
        let mut display = ResultDisplay::new();

        let view = display.render(&state(Some(marcos()), false, None));

        let card = view.card().unwrap();
        assert_eq!(card.title, "Marcos");
        assert_eq!(card.handle, "TheMaff");
        assert_eq!(card.repos_label, "42 repos públicos");
        assert_eq!(card.profile_url, "http://github.com/TheMaff");
        assert_eq!(card.biography.as_deref(), Some("Frontend dev"));
    }

    #[test]
    fn card_title_falls_back_to_handle() {
        let mut profile = marcos();
        profile.display_name = None;
        profile.biography = Some(String::new());

        let card = Card::from(&profile);

        assert_eq!(card.title, "TheMaff");
        assert_eq!(card.biography, None);
    }

    #[test]
    fn loading_suppresses_user_and_error() {
        assert_eq!(
            CardView::from_state(&state(Some(marcos()), true, None)),
            CardView::Loading
        );
        assert_eq!(
            CardView::from_state(&state(None, true, Some(ViewError::NotFound))),
            CardView::Loading
        );
    }

    #[test]
    fn each_error_has_its_own_view() {
        assert_eq!(
            CardView::from_state(&state(None, false, Some(ViewError::EmptyInput))),
            CardView::EmptyInput
        );
        assert_eq!(
            CardView::from_state(&state(None, false, Some(ViewError::NotFound))),
            CardView::NotFound
        );
        assert_eq!(
            CardView::from_state(&state(None, false, Some(ViewError::GenericError))),
            CardView::GenericError
        );
        assert!(CardView::NotFound.is_error());
        assert!(CardView::GenericError.is_error());
        assert!(!CardView::EmptyInput.is_error());
    }

    #[test]
    fn initial_state_is_idle() {
        let display = ResultDisplay::new();

        assert_eq!(display.view(), &CardView::Idle);
        assert_eq!(
            CardView::from_state(&ViewState::default()),
            CardView::Idle
        );
    }

    #[test]
    fn messages_never_include_error_details() {
        let views = [
            CardView::Idle,
            CardView::Loading,
            CardView::EmptyInput,
            CardView::NotFound,
            CardView::GenericError,
        ];
        for view in &views {
            assert!(!view.message().is_empty());
        }
        assert_eq!(
            CardView::GenericError.message(),
            "Ocurrió un error al consultar la API de GitHub. Intenta más tarde."
        );
    }

    #[test]
    fn render_is_deterministic() {
        let mut display = ResultDisplay::new();
        let populated = state(Some(marcos()), false, None);

        let first = display.render(&populated).clone();
        display.render(&state(None, true, None));
        let again = display.render(&populated).clone();

        assert_eq!(first, again);
    }
}
