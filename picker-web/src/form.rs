use location_picker::FormFields;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement};

/// `<input>` elements of the page, addressed by id.
pub struct DomFormFields {
    document: Document,
}

impl DomFormFields {
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    fn input(&self, id: &str) -> Option<HtmlInputElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    }
}

impl FormFields for DomFormFields {
    fn value(&self, id: &str) -> Option<String> {
        self.input(id).map(|input| input.value())
    }

    fn set_value(&self, id: &str, value: &str) {
        let Some(input) = self.input(id) else {
            log::warn!("No input field with id '{id}' found");
            return;
        };
        input.set_value(value);
    }
}
