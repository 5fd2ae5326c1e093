//! HTML pages
//!
//! The swap form markup is what the form validation binds to: the
//! `validate-form` form, `validate-input` wrappers carrying `data-validate`,
//! `input100` inputs and the `selection-2` deposit select.

use submarine_payreq::{Currency, DEPOSIT_PLACEHOLDER};

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Submarine Swaps</title>
<link rel="stylesheet" href="/static/css/main.css">
</head>
<body>
<nav class="topnav"><a href="/">Home</a> <a href="/swap">New swap</a></nav>
<main>
{body}
</main>
<footer>Submarine Swaps</footer>
</body>
</html>
"#
    )
}

pub fn home_page() -> String {
    layout(
        "Home",
        r#"<h1>Submarine Swaps</h1>
<p>Pay a Lightning invoice with an on-chain deposit.</p>
<p><a href="/swap">Create a swap</a></p>"#,
    )
}

pub fn swap_page() -> String {
    let mut options = format!("<option>{}</option>\n", DEPOSIT_PLACEHOLDER);
    for currency in Currency::ALL {
        options.push_str(&format!(
            "<option value=\"{}\">{}</option>\n",
            currency.hrp, currency.name
        ));
    }

    let body = format!(
        r#"<h1>New swap</h1>
<form class="validate-form" method="post" action="/swap">
<div class="wrap-input100 validate-input" data-validate="Lightning invoice is required">
<input class="input100" type="text" name="invoice" placeholder="Lightning invoice">
</div>
<div class="wrap-input100 validate-input" data-validate="Deposit currency is required">
<select class="selection-2" name="deposit">
{options}</select>
</div>
<button type="submit">Create swap</button>
</form>"#
    );
    layout("New swap", &body)
}
