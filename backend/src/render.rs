use std::fmt::Write;

use shared::{PageContext, Result, Tally, VoteError, RESET_ACTION};

const STYLE: &str = "\
body { background-color: #F8F8F8; font-family: Arial, Helvetica, sans-serif; }
#container { margin: 40px auto; width: 520px; text-align: center; }
#logo { font-size: 28px; font-weight: bold; margin-bottom: 24px; }
.button { border: none; color: white; padding: 14px 28px; margin: 6px; font-size: 16px; cursor: pointer; width: 160px; }
.button1 { background-color: #008CBA; }
.button2 { background-color: #4CAF50; }
.button3 { background-color: #f44336; }
#results { margin-top: 24px; font-size: 20px; }";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_button(out: &mut String, tally: &Tally, class: &str) -> std::fmt::Result {
    let label = escape(tally.option.label());
    writeln!(
        out,
        r#"      <button name="vote" value="{label}" class="button {class}">{label}</button>"#
    )
}

fn write_page(out: &mut String, ctx: &PageContext) -> std::fmt::Result {
    let title = escape(&ctx.title);

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, r#"<html lang="en">"#)?;
    writeln!(out, "<head>")?;
    writeln!(out, r#"  <meta charset="utf-8">"#)?;
    writeln!(out, "  <title>{title}</title>")?;
    writeln!(out, "  <style>\n{STYLE}\n  </style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, r#"  <div id="container">"#)?;
    writeln!(out, r#"    <form id="form" name="form" action="/" method="post">"#)?;
    writeln!(out, r#"      <div id="logo">{title}</div>"#)?;
    write_button(out, &ctx.first, "button1")?;
    write_button(out, &ctx.second, "button2")?;
    writeln!(
        out,
        r#"      <button name="vote" value="{RESET_ACTION}" class="button button3">Reset</button>"#
    )?;
    writeln!(
        out,
        r#"      <div id="results">{} - {} | {} - {}</div>"#,
        escape(ctx.first.option.label()),
        ctx.first.count,
        escape(ctx.second.option.label()),
        ctx.second.count
    )?;
    writeln!(out, "    </form>")?;
    writeln!(out, "  </div>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

pub fn render_page(ctx: &PageContext) -> Result<String> {
    let mut out = String::with_capacity(2048);
    write_page(&mut out, ctx).map_err(|e| VoteError::RenderError(e.to_string()))?;
    Ok(out)
}
