/// The exact field set posted to the gateway. Constructed once per
/// handoff, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub key: String,
    pub txnid: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub phone: String,
    pub udf1: String,
    pub udf2: String,
    pub udf3: String,
    pub udf4: String,
    pub udf5: String,
    pub salt: String,
    pub surl: String,
    pub furl: String,
}

/// A one-way handoff: the UI renders this as an auto-submitting form and
/// the page unloads. Field order follows the gateway contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRedirect {
    pub endpoint: String,
    pub method: String,
    pub fields: Vec<(String, String)>,
}

impl PaymentRedirect {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn to_form_html(&self) -> String {
        let mut html = format!(
            "<form id=\"gateway-redirect\" action=\"{}\" method=\"{}\">\n",
            escape_html(&self.endpoint),
            escape_html(&self.method)
        );
        for (name, value) in &self.fields {
            html.push_str(&format!(
                "  <input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                escape_html(name),
                escape_html(value)
            ));
        }
        html.push_str("</form>\n<script>document.getElementById(\"gateway-redirect\").submit();</script>\n");
        html
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_html_escapes_values() {
        let redirect = PaymentRedirect {
            endpoint: "https://gateway.test/_payment".to_string(),
            method: "POST".to_string(),
            fields: vec![("productinfo".to_string(), "Gold & \"Spa\"".to_string())],
        };

        let html = redirect.to_form_html();
        assert!(html.contains("Gold &amp; &quot;Spa&quot;"));
        assert!(html.contains("action=\"https://gateway.test/_payment\""));
        assert!(html.contains(".submit()"));
    }
}
