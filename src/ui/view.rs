//! Declarative view tree
//!
//! The tree is rebuilt from controller state after every event. Nodes that
//! automation needs to reach carry a stable test identifier, so state can be
//! asserted without looking at pixels.

use serde::Serialize;

use crate::app::{HostPlatform, OtpController, Outcome, SubmissionStatus, Verifier};
use crate::domain::CODE_LENGTH;
use crate::domain::selection::Selection;

/// Stable identifiers for inspection and automation
pub mod test_ids {
    pub const ROW: &str = "otp-row";
    pub const HIDDEN_INPUT: &str = "otp-hidden-input";
    pub const LOADING: &str = "otp-loading";
    pub const RESULT: &str = "otp-result";
    pub const SUBMIT: &str = "otp-submit";

    pub fn input_box(index: usize) -> String {
        format!("otp-box-{index}")
    }

    pub fn box_text(index: usize) -> String {
        format!("otp-box-text-{index}")
    }
}

/// Keyboard the host should show for the hidden field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyboardType {
    NumberPad,
}

/// Autofill hint offered to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AutofillHint {
    OneTimeCode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    Column,
    Row,
    Text {
        content: String,
    },
    /// Tappable box around one digit
    Pressable {
        highlighted: bool,
        disabled: bool,
    },
    /// Off-screen field that receives every keystroke
    HiddenInput {
        value: String,
        selection: Selection,
        editable: bool,
        keyboard: KeyboardType,
        autofill: AutofillHint,
    },
    Spinner,
    /// Terminal result of the attempt, visible until the form resets
    ResultIndicator {
        success: bool,
    },
    Button {
        label: String,
        disabled: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    pub test_id: Option<String>,
    pub kind: NodeKind,
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            test_id: None,
            kind,
            children: Vec::new(),
        }
    }

    fn with_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = Some(id.into());
        self
    }

    fn with_children(mut self, children: Vec<ViewNode>) -> Self {
        self.children = children;
        self
    }

    fn text(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Text {
            content: content.into(),
        })
    }
}

/// Inputs needed to build the tree, captured from the controller
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub title: String,
    pub boxes: [String; CODE_LENGTH],
    pub selection: Selection,
    pub status: SubmissionStatus,
    pub outcome: Option<Outcome>,
    pub submit_enabled: bool,
}

impl ViewModel {
    pub fn from_controller<H: HostPlatform, V: Verifier>(controller: &OtpController<H, V>) -> Self {
        Self {
            title: controller.config().title.clone(),
            boxes: controller.buffer().display(),
            selection: controller.selection(),
            status: controller.status(),
            outcome: controller.outcome().cloned(),
            submit_enabled: controller.submit_enabled(),
        }
    }
}

/// Root of the rendered widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewTree {
    pub root: ViewNode,
}

impl ViewTree {
    pub fn build(model: &ViewModel) -> Self {
        let editable = model.status.is_editable();

        let boxes = model
            .boxes
            .iter()
            .enumerate()
            .map(|(index, digit)| {
                ViewNode::new(NodeKind::Pressable {
                    highlighted: editable && model.selection.highlights(index),
                    disabled: !editable,
                })
                .with_id(test_ids::input_box(index))
                .with_children(vec![ViewNode::text(digit.clone()).with_id(test_ids::box_text(index))])
            })
            .collect();

        let hidden_input = ViewNode::new(NodeKind::HiddenInput {
            value: String::new(),
            selection: model.selection,
            editable,
            keyboard: KeyboardType::NumberPad,
            autofill: AutofillHint::OneTimeCode,
        })
        .with_id(test_ids::HIDDEN_INPUT);

        let status_slot = match (&model.status, &model.outcome) {
            (SubmissionStatus::Submitting, None) => ViewNode::new(NodeKind::Row).with_children(vec![
                ViewNode::new(NodeKind::Spinner).with_id(test_ids::LOADING),
                ViewNode::text("Verifying..."),
            ]),
            (_, Some(outcome)) => ViewNode::new(NodeKind::ResultIndicator {
                success: outcome.is_success(),
            })
            .with_id(test_ids::RESULT)
            .with_children(vec![ViewNode::text(match outcome {
                Outcome::Success => "Verified",
                Outcome::Failure { .. } => "Verification failed",
            })]),
            (SubmissionStatus::Idle, None) => ViewNode::new(NodeKind::Button {
                label: "Submit".to_string(),
                disabled: !model.submit_enabled,
            })
            .with_id(test_ids::SUBMIT),
        };

        let root = ViewNode::new(NodeKind::Column).with_children(vec![
            ViewNode::text(model.title.clone()),
            ViewNode::new(NodeKind::Row)
                .with_id(test_ids::ROW)
                .with_children(boxes),
            hidden_input,
            status_slot,
        ]);

        Self { root }
    }

    pub fn from_controller<H: HostPlatform, V: Verifier>(controller: &OtpController<H, V>) -> Self {
        Self::build(&ViewModel::from_controller(controller))
    }

    /// Depth-first lookup by test identifier
    pub fn find(&self, id: &str) -> Option<&ViewNode> {
        fn walk<'a>(node: &'a ViewNode, id: &str) -> Option<&'a ViewNode> {
            if node.test_id.as_deref() == Some(id) {
                return Some(node);
            }
            node.children.iter().find_map(|child| walk(child, id))
        }
        walk(&self.root, id)
    }

    /// Text content of the node with `id`
    pub fn text_of(&self, id: &str) -> Option<&str> {
        match &self.find(id)?.kind {
            NodeKind::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Displayed character of every box, in order
    pub fn box_texts(&self) -> Vec<String> {
        (0..CODE_LENGTH)
            .map(|index| {
                self.text_of(&test_ids::box_text(index))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}
