//! HTML for the two pages plus an error page.

use zipweather_core::LookupResult;

const STYLE: &str = "body{font-family:sans-serif;max-width:32rem;margin:3rem auto;padding:0 1rem}\
                     .temp{font-size:2.5rem;margin:.5rem 0}.muted{color:#666}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title),
    )
}

fn lookup_form(zip: &str) -> String {
    format!(
        "<form action=\"/lookup\" method=\"post\">\n\
         <label for=\"zipCode\">Zip code</label>\n\
         <input id=\"zipCode\" name=\"zipCode\" inputmode=\"numeric\" value=\"{}\" required>\n\
         <button type=\"submit\">Look up</button>\n</form>",
        escape(zip),
    )
}

pub fn home() -> String {
    let body = format!(
        "<h1>Current temperature</h1>\n\
         <p>Enter a US zip code to get the latest reading from the nearest weather station.</p>\n{}",
        lookup_form(""),
    );
    layout("zipweather", &body)
}

pub fn lookup(result: &LookupResult) -> String {
    let mut body = format!(
        "<h1>{}, {} {}</h1>\n\
         <p class=\"temp\">{:.1} &deg;C / {:.1} &deg;F</p>\n\
         <p class=\"muted\">Station {}",
        escape(&result.city),
        escape(&result.state),
        escape(&result.zip_code),
        result.temperature,
        result.temperature_fahrenheit(),
        escape(&result.station),
    );
    if let Some(at) = result.observed_at {
        body.push_str(&format!(", observed {}", at.format("%Y-%m-%d %H:%M UTC")));
    }
    body.push_str("</p>\n");
    body.push_str(&lookup_form(&result.zip_code));

    layout(&format!("Weather for {}", result.zip_code), &body)
}

pub fn error(message: &str, zip: &str) -> String {
    let body = format!(
        "<h1>Lookup failed</h1>\n<p>{}</p>\n{}\n<p><a href=\"/\">Home</a></p>",
        escape(message),
        lookup_form(zip),
    );
    layout("Lookup failed", &body)
}

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
