//! Browser checkout helpers.
//!
//! The hosted checkout script takes a signed charge request object and two
//! redirect URLs. These helpers build that object and the HTML that wires it
//! to a pay button.

use crate::signing::RequestSigner;
use crate::types::{ChargeRequestLanguage, ClientChargeRequest, CustomerInfoClient, Order};
use crate::Result;

/// Logo used when no custom button markup is supplied.
pub const DEFAULT_BUTTON_IMAGE: &str = "https://www.atfawry.com/assets/img/FawryPayLogo.jpg";

/// Renders custom button markup given the `onclick` JavaScript expression.
pub type ButtonRenderer = fn(&str) -> String;

#[derive(Clone, Copy, Default)]
pub struct ButtonOptions {
    /// Replaces the default image button.
    pub custom_button: Option<ButtonRenderer>,
    /// Emit the button and script without the wrapping `<div>`.
    pub exclude_div: bool,
}

impl std::fmt::Debug for ButtonOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonOptions")
            .field("custom_button", &self.custom_button.is_some())
            .field("exclude_div", &self.exclude_div)
            .finish()
    }
}

/// Build the signed charge request as a JSON object literal.
#[allow(clippy::result_large_err)]
pub fn client_charge_request(
    merchant_code: &str,
    secret: &str,
    merchant_ref_number: &str,
    customer: &CustomerInfoClient,
    order: &Order,
    language: ChargeRequestLanguage,
) -> Result<String> {
    let request = ClientChargeRequest {
        merchant_code: merchant_code.to_string(),
        merchant_ref_number: merchant_ref_number.to_string(),
        customer: customer.clone(),
        order: order.clone(),
        language,
    };
    RequestSigner::new(secret).sign(&request)?.to_json()
}

/// HTML snippet for a checkout button bound to `charge_request`.
pub fn button_html(
    success_url: &str,
    failure_url: &str,
    charge_request: &str,
    div_id: &str,
    options: &ButtonOptions,
) -> String {
    let onclick = "FawryPay.checkout(chargeRequest,successPageUrl, failurePageUrl)";
    let button = match options.custom_button {
        Some(render) => render(onclick),
        None => format!(
            "<input type='image' onclick='{}' src='{}'/>",
            onclick, DEFAULT_BUTTON_IMAGE
        ),
    };

    let main = format!(
        "{button}\n<script>\n    var successPageUrl='{success}';\n    var failurePageUrl='{failure}';\n    var chargeRequest={charge_request};\n</script>",
        button = button,
        success = js_single_quoted(success_url),
        failure = js_single_quoted(failure_url),
        charge_request = script_safe(charge_request),
    );

    if options.exclude_div {
        main
    } else {
        format!("<div id='{}'>\n{}\n</div>", html_attribute(div_id), main)
    }
}

fn js_single_quoted(value: &str) -> String {
    script_safe(&value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// JSON or a JS string literal made safe to sit inside `<script>`.
///
/// `<` only occurs inside string literals there, where `\u003c` decodes back to it.
fn script_safe(value: &str) -> String {
    value.replace('<', "\\u003c")
}

fn html_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('\'', "&#39;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
