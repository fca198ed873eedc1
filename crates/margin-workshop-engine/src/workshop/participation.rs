/// What the current user may do on the manuscript being viewed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Participation {
    pub is_owner: bool,
    pub is_invited_reviewer: bool,
    /// The workshop has been marked complete; feedback is closed.
    pub is_completed: bool,
    /// The owner is editing the manuscript text.
    pub is_editing: bool,
}

impl Participation {
    /// Derive participation from identities. Email comparison ignores case.
    pub fn resolve(
        user_id: Option<&str>,
        user_email: Option<&str>,
        owner_id: &str,
        collaborators: &[String],
    ) -> Self {
        let is_owner = user_id == Some(owner_id);
        let is_invited_reviewer = user_email.is_some_and(|email| {
            let email = email.to_lowercase();
            collaborators.iter().any(|c| c.to_lowercase() == email)
        });
        Self {
            is_owner,
            is_invited_reviewer,
            ..Self::default()
        }
    }

    /// An invited reviewer on an open workshop.
    pub fn reviewer() -> Self {
        Self {
            is_invited_reviewer: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    #[must_use]
    pub fn editing(mut self, is_editing: bool) -> Self {
        self.is_editing = is_editing;
        self
    }

    pub fn can_participate(&self) -> bool {
        self.is_owner || self.is_invited_reviewer
    }

    /// Selecting text and creating annotations is reserved for invited
    /// reviewers while the workshop is open and the text is not being edited.
    pub fn can_use_highlight_tools(&self) -> bool {
        self.is_invited_reviewer && !self.is_completed && !self.is_editing
    }

    /// Replies are open to any participant until the workshop completes.
    pub fn can_reply(&self) -> bool {
        self.can_participate() && !self.is_completed
    }
}
