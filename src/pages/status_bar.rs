//! The status bar: always present, never part of the regular page stack.
//! `StatusMachine` pushes directly to its `status-utterance`/`status-spinner`
//! event ids, bypassing the usual last-shown gating other pages go through.

use gui::document::{Child, DocumentTree, Element};
use gui::error::GuiResult;
use gui::page::{PageBuild, PageDefinition};
use std::collections::HashMap;

pub struct StatusBarPage;

impl PageDefinition for StatusBarPage {
    fn page_id(&self) -> &str {
        "status-bar"
    }

    fn uri(&self) -> &str {
        "status_bar"
    }

    fn build(&self) -> GuiResult<PageBuild> {
        let mut root = Element::new("div");
        root.attributes.insert("id".into(), "status-bar".into());
        let mut document = DocumentTree::new(root);

        let mut utterance = Element::new("div");
        utterance.attributes.insert("id".into(), "status-utterance".into());
        utterance.attributes.insert("sse-swap".into(), "status-utterance".into());
        utterance.attributes.insert("hx-swap".into(), "innerHTML".into());
        let utterance_id = document.create(utterance);
        document.append_child(document.root(), Child::Element(utterance_id));

        let mut spinner = Element::new("lottie-player");
        spinner.attributes.insert("id".into(), "status-spinner".into());
        spinner.attributes.insert("class".into(), "hidden".into());
        spinner.attributes.insert("sse-swap".into(), "status-spinner".into());
        spinner.attributes.insert("hx-swap".into(), "none".into());
        spinner.self_closing = true;
        let spinner_id = document.create(spinner);
        document.append_child(document.root(), Child::Element(spinner_id));

        Ok(PageBuild {
            document,
            parameters: Vec::new(),
            dialogs: HashMap::new(),
            local_callbacks: Vec::new(),
            global_callbacks: Vec::new(),
        })
    }
}
