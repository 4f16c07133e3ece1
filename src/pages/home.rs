//! A minimal home screen page: shows the current volume level and lets the
//! browser bump it via a local callback, demonstrating the binding and
//! callback wiring every skill-provided page goes through.

use gui::binding::Binding;
use gui::callback::{CallbackContext, CallbackOutcome, CallbackRecord};
use gui::document::{Child, DocumentTree, Element};
use gui::error::GuiResult;
use gui::page::{PageBuild, PageDefinition};
use std::collections::HashMap;
use std::sync::Arc;

pub struct HomePage;

impl PageDefinition for HomePage {
    fn page_id(&self) -> &str {
        "home"
    }

    fn uri(&self) -> &str {
        "home"
    }

    fn build(&self) -> GuiResult<PageBuild> {
        let mut root = Element::new("div");
        root.attributes.insert("id".into(), "home".into());
        root.attributes.insert("class".into(), "page".into());
        let mut document = DocumentTree::new(root);

        let mut volume = Element::new("span");
        volume.attributes.insert("id".into(), "volume-display".into());
        let volume_id = document.create(volume);
        document.append_child(document.root(), Child::Element(volume_id));

        let mut button = Element::new("button");
        button.attributes.insert("id".into(), "volume-up".into());
        button.attributes.insert("hx-trigger".into(), "click".into());
        let button_id = document.create(button);
        document.append_child(button_id, Child::Raw("Volume up".into()));
        document.append_child(document.root(), Child::Element(button_id));

        let binding = Binding::new("volume", "#volume-display", vec!["inner_content".into()]);

        document.set_attribute(button_id, "hx-get", "/local-event/volume-up-clicked");
        document.set_attribute(button_id, "hx-target", "#volume-display");

        let callback = CallbackRecord {
            context: CallbackContext::Local,
            event_expr: "click".to_string(),
            event_id: "volume-up-clicked".to_string(),
            function: Arc::new(|_event| CallbackOutcome::Local("<span id=\"volume-display\">updated</span>".to_string())),
            source: "#volume-up".to_string(),
            target: "#volume-display".to_string(),
            swap: gui::SwapMode::OuterHtml,
        };

        Ok(PageBuild {
            document,
            parameters: vec![binding],
            dialogs: HashMap::new(),
            local_callbacks: vec![callback],
            global_callbacks: Vec::new(),
        })
    }
}
