use lol_html::{element, HtmlRewriter, Settings};
use once_cell::sync::Lazy;
use regex::Regex;

use super::RenderOptions;
use crate::prelude::*;

static URL_SCHEMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z+.\-]+:").unwrap());

/// Applies the HTML-level rewrites to rendered output:
/// - `<img>` tags get `loading="lazy"` (if enabled).
/// - Relative `<img>` sources are resolved against the project's image base URL.
///
/// A `src` is relative when it has no URL scheme and doesn't start with `/` or `#`.
/// `img/cat.png` in project `notes` becomes `<root_url>/projects/notes/img/cat.png`.
pub fn rewrite(hypertext: &str, options: &RenderOptions) -> Result<String> {
    if !options.lazy_images && options.image_base.is_none() {
        return Ok(hypertext.to_owned());
    }

    let mut output = vec![];
    {
        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![
                    element!("img", |el| {
                        if options.lazy_images {
                            el.set_attribute("loading", "lazy")?;
                        }

                        let Some(base) = &options.image_base else {
                            return Ok(());
                        };

                        if let Some(src) = el.get_attribute("src") {
                            if is_relative(&src) {
                                let src = format!("{base}{}", src.trim_start_matches("./"));
                                el.set_attribute("src", &src)?;
                            }
                        }

                        Ok(())
                    }),
                ],
                ..Settings::default()
            },
            |c: &[u8]| output.extend_from_slice(c),
        );
        rewriter.write(hypertext.as_bytes())?;
        rewriter.end()?;
    }
    let hypertext = String::from_utf8(output)
        .wrap_err("HTML rewriting produced invalid UTF-8.")?;
    Ok(hypertext)
}

fn is_relative(src: &str) -> bool {
    !src.is_empty()
        && !URL_SCHEMA.is_match(src)
        && !src.starts_with('/')
        && !src.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(lazy_images: bool, image_base: Option<&str>) -> RenderOptions {
        RenderOptions {
            lazy_images,
            image_base: image_base.map(str::to_owned),
            ..RenderOptions::default()
        }
    }

    #[test]
    fn relative_sources() {
        assert!(is_relative("cat.png"));
        assert!(is_relative("img/cat.png"));
        assert!(is_relative("./img/cat.png"));
        assert!(is_relative("../other/img/cat.png"));

        assert!(!is_relative(""));
        assert!(!is_relative("/img/cat.png"));
        assert!(!is_relative("//cdn.example.com/cat.png"));
        assert!(!is_relative("https://example.com/cat.png"));
        assert!(!is_relative("data:image/png;base64,AAAA"));
    }

    #[test]
    fn images_are_rewritten() {
        let html = r#"<p><img src="./img/cat.png" alt="cat"><img src="https://example.com/dog.png"></p>"#;
        let output = rewrite(html, &options(true, Some("http://localhost:3000/projects/notes/"))).unwrap();

        assert!(output.contains(r#"src="http://localhost:3000/projects/notes/img/cat.png""#));
        assert!(output.contains(r#"src="https://example.com/dog.png""#));
        assert_eq!(output.matches(r#"loading="lazy""#).count(), 2);
    }

    #[test]
    fn lazy_loading_only() {
        let html = r#"<img src="img/cat.png">"#;
        let output = rewrite(html, &options(true, None)).unwrap();

        assert!(output.contains(r#"src="img/cat.png""#));
        assert!(output.contains(r#"loading="lazy""#));
    }

    #[test]
    fn disabled() {
        let html = r#"<img src="img/cat.png">"#;
        assert_eq!(rewrite(html, &options(false, None)).unwrap(), html);
    }
}
