use crate::annotations::AnnotationKind;

/// Visual weight of a highlighted run, picked by priority:
/// draft, then selected, then resolved, then the default unresolved style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presentation {
    Draft,
    Selected,
    Resolved,
    Unresolved,
}

impl Presentation {
    pub fn of(is_draft: bool, is_selected: bool, is_resolved: bool) -> Self {
        if is_draft {
            Presentation::Draft
        } else if is_selected {
            Presentation::Selected
        } else if is_resolved {
            Presentation::Resolved
        } else {
            Presentation::Unresolved
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Presentation::Draft => "annotation-draft",
            Presentation::Selected => "annotation-selected",
            Presentation::Resolved => "annotation-resolved",
            Presentation::Unresolved => "annotation",
        }
    }
}

/// Space-separated class list for a highlighted run.
pub fn class_list(presentation: Presentation, kind: AnnotationKind) -> String {
    match kind {
        AnnotationKind::Strikethrough => {
            format!("{} annotation-strikethrough", presentation.class_name())
        }
        _ => presentation.class_name().to_string(),
    }
}
