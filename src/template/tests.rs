use super::parse::Expr;
use super::*;
use crate::config::{DEFAULT_COMPILATION_FORMAT, DEFAULT_FORMAT};
use crate::meta::{FieldValue, normalize};

fn fields(pairs: &[(&str, FieldValue)]) -> FieldStore {
    let mut f: FieldStore = pairs.iter().map(|(k, v)| (*k, v.clone())).collect();
    normalize(&mut f, false);
    f
}

fn text(s: &str) -> FieldValue {
    FieldValue::Text(s.to_string())
}

fn album_fields() -> FieldStore {
    fields(&[
        ("title", text("full")),
        ("artist", text("the artist")),
        ("albumartist", text("the album artist")),
        ("album", text("the album")),
        ("year", FieldValue::Int(2001)),
        ("disc", FieldValue::Int(4)),
        ("disctotal", FieldValue::Int(5)),
        ("track", FieldValue::Int(2)),
        ("tracktotal", FieldValue::Int(10)),
    ])
}

fn render(format: &str, f: &FieldStore) -> String {
    PathFormat::compile(format, &Builtins)
        .unwrap()
        .render(f, &Builtins, false)
        .unwrap()
}

#[test]
fn parse_splits_literals_fields_and_calls() {
    let t = parse("a$b${c}%f{x,$y}").unwrap();
    assert_eq!(
        t.parts,
        vec![
            Expr::Literal("a".into()),
            Expr::Field("b".into()),
            Expr::Field("c".into()),
            Expr::Call {
                name: "f".into(),
                args: vec![
                    Template {
                        parts: vec![Expr::Literal("x".into())]
                    },
                    Template {
                        parts: vec![Expr::Field("y".into())]
                    },
                ],
            },
        ]
    );
}

#[test]
fn bare_identifier_stops_before_trailing_underscore() {
    let t = parse("$album_$year_safe").unwrap();
    assert_eq!(
        t.parts,
        vec![
            Expr::Field("album".into()),
            Expr::Literal("_".into()),
            Expr::Field("year_safe".into()),
        ]
    );
}

#[test]
fn escapes_and_lone_sigils_are_literal() {
    let t = parse("$$5 %% 100% $").unwrap();
    assert_eq!(t.parts, vec![Expr::Literal("$5 %% 100% $".into())]);

    let t = parse("%f{a$,b}").unwrap();
    assert_eq!(
        t.parts,
        vec![Expr::Call {
            name: "f".into(),
            args: vec![Template {
                parts: vec![Expr::Literal("a,b".into())]
            }],
        }]
    );
}

#[test]
fn top_level_commas_and_braces_are_text() {
    let t = parse("a, b}").unwrap();
    assert_eq!(t.parts, vec![Expr::Literal("a, b}".into())]);
}

#[test]
fn empty_call_has_no_arguments() {
    let t = parse("%f{}").unwrap();
    assert_eq!(
        t.parts,
        vec![Expr::Call {
            name: "f".into(),
            args: vec![]
        }]
    );
}

#[test]
fn syntax_errors_are_reported() {
    assert!(matches!(parse("${album"), Err(TemplateError::Syntax { .. })));
    assert!(matches!(parse("${}"), Err(TemplateError::Syntax { .. })));
    assert!(matches!(parse("${a b}"), Err(TemplateError::Syntax { .. })));
    assert!(matches!(
        parse("%shorten{$title,32"),
        Err(TemplateError::Syntax { .. })
    ));
}

#[test]
fn unknown_function_fails_at_compile_time() {
    let err = PathFormat::compile("$artist/%nosuch{$title}", &Builtins).unwrap_err();
    assert_eq!(err, TemplateError::UnknownFunction("nosuch".into()));

    let err = PathFormat::compile("%shorten{%bogus{x},3}", &Builtins).unwrap_err();
    assert_eq!(err, TemplateError::UnknownFunction("bogus".into()));
}

#[test]
fn default_format_renders_album_path() {
    assert_eq!(
        render(DEFAULT_FORMAT, &album_fields()),
        "t/the album artist/the album_2001/4-02_full"
    );
}

#[test]
fn default_compilation_format_renders_compilation_path() {
    assert_eq!(
        render(DEFAULT_COMPILATION_FORMAT, &album_fields()),
        "_compilations/t/the album_2001/4-02_full"
    );
}

#[test]
fn renders_documented_example() {
    let f = fields(&[
        ("albumartist", text("")),
        ("artist", text("The Album Artist")),
        ("album", text("The Album")),
        ("year", FieldValue::Int(2001)),
        ("disc", text("")),
        ("disctotal", FieldValue::Int(1)),
        ("track", FieldValue::Int(4)),
        ("tracktotal", FieldValue::Int(12)),
        ("title", text("Some Title")),
    ]);
    assert_eq!(
        render(
            "$artist_initial/$artistsafe_sort/$album_$year_safe/${disctrack}_$title",
            &f
        ),
        "t/The Album Artist/The Album_2001/04_Some Title"
    );
}

#[test]
fn unknown_fields_render_empty() {
    let f = album_fields();
    assert_eq!(render("x${nosuchfield}y", &f), "xy");
    assert_eq!(render("$nosuch/$title", &f), "full");
}

#[test]
fn field_values_never_add_directories() {
    let mut f = FieldStore::new();
    // Bypass normalization to check the evaluator's own guard.
    f.set("title", "a/b\\c");
    f.set("album", "..");
    assert_eq!(render("$album/$title", &f), "_/a_b_c");
}

#[test]
fn nested_calls_resolve_innermost_first() {
    let f = album_fields();
    assert_eq!(
        render("%upper{%shorten{$album,5}}%ifdef{year_safe,-%left{$year_safe,2}}", &f),
        "THE A-20"
    );
}

#[test]
fn ifdef_omits_suffix_without_year() {
    let f = fields(&[("album", text("Demo")), ("title", text("One"))]);
    assert_eq!(render("$album%ifdef{year_safe,_${year_safe}}", &f), "Demo");
}

#[test]
fn evaluation_is_idempotent() {
    let f = album_fields();
    let format = PathFormat::compile(DEFAULT_FORMAT, &Builtins).unwrap();
    let first = format.render(&f, &Builtins, true).unwrap();
    let second = format.render(&f, &Builtins, true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn shell_friendly_render() {
    let f = album_fields();
    let format = PathFormat::compile(DEFAULT_FORMAT, &Builtins).unwrap();
    assert_eq!(
        format.render(&f, &Builtins, true).unwrap(),
        "t/the_album_artist/the_album_2001/4-02_full"
    );
}

#[test]
fn transliteration_keeps_lookalike_slashes_inside_segments() {
    let f = fields(&[
        ("artist", text("AC\u{2044}DC")),
        ("album", text("Back\u{2215}Black")),
        ("title", text("One")),
    ]);
    let format = PathFormat::compile("$artistsafe_sort/$album/$title", &Builtins).unwrap();
    assert_eq!(
        format.render(&f, &Builtins, false).unwrap(),
        "AC\u{2044}DC/Back\u{2215}Black/One"
    );
    assert_eq!(
        format.render(&f, &Builtins, true).unwrap(),
        "AC_DC/Back_Black/One"
    );
    assert_eq!(render("%asciify{$artist}/$title", &f), "AC_DC/One");
}
