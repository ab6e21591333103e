//! Load, respace, export and reload complete fonts.

use font_spacing::{
    directory::TableDirectory, Adjustment, FontDocument, Masters, Outcome, SideBearings,
    SpacingConfig, SpacingMethod, SpacingSettings, Tag,
};
use kurbo::PathEl;
use pretty_assertions::assert_eq;
use rstest::rstest;
use spacing_test_data::{latin_fixture, latin_font, GlyphSpec, ACCENTED};

fn masters() -> Masters {
    Masters {
        upper_stem: SideBearings::new(80.0, 80.0),
        upper_round: SideBearings::new(70.0, 70.0),
        lower_stem: SideBearings::new(40.0, 35.0),
        lower_round: SideBearings::new(45.0, 45.0),
    }
}

fn reload(font: &mut FontDocument) -> FontDocument {
    let data = font.export("Spacing Test").unwrap();
    FontDocument::load(&data).unwrap()
}

#[test]
fn proportional_scenario() {
    let mut font = FontDocument::load(&latin_font()).unwrap();
    let report = font.apply(SpacingMethod::Proportional, &SpacingSettings::new(masters()));
    assert!(report.num_at_target() > 52);

    let font = reload(&mut font);
    assert_eq!(font.num_glyphs(), 62);
    for ch in ['M', 'N'] {
        assert_eq!(font.side_bearings(ch), Some(SideBearings::new(92.0, 92.0)));
    }
    assert_eq!(font.side_bearings('T'), Some(SideBearings::new(20.0, 20.0)));
    assert_eq!(font.side_bearings('H'), Some(SideBearings::new(80.0, 80.0)));
    assert_eq!(font.side_bearings('n'), Some(SideBearings::new(40.0, 35.0)));
}

#[test]
fn accented_letters_follow_their_base() {
    let mut font = FontDocument::load(&latin_font()).unwrap();
    font.apply(SpacingMethod::Topological, &SpacingSettings::new(masters()));
    let font = reload(&mut font);
    for (accented, base, _) in ACCENTED {
        // masters are restored after their accented forms are set
        if Masters::LETTERS.contains(base) {
            continue;
        }
        assert_eq!(
            font.side_bearings(*accented),
            font.side_bearings(*base),
            "{accented}"
        );
    }
}

#[rstest]
#[case(SpacingMethod::Proportional)]
#[case(SpacingMethod::Topological)]
fn overrides_take_precedence(#[case] method: SpacingMethod) {
    let settings = SpacingSettings::new(masters())
        .with_override('A', Some(7.0), Some(9.0))
        .with_override('n', None, Some(50.0));
    let mut font = FontDocument::load(&latin_font()).unwrap();
    font.apply(method, &settings);
    let font = reload(&mut font);
    assert_eq!(font.side_bearings('A'), Some(SideBearings::new(7.0, 9.0)));
    assert_eq!(font.side_bearings('n'), Some(SideBearings::new(40.0, 50.0)));
}

#[rstest]
#[case(SpacingMethod::Original)]
#[case(SpacingMethod::Proportional)]
#[case(SpacingMethod::Topological)]
fn every_method_exports(#[case] method: SpacingMethod) {
    let mut font = FontDocument::load(&latin_font()).unwrap();
    let settings = SpacingSettings::measure(&font).unwrap();
    font.apply(method, &settings);
    let reloaded = reload(&mut font);
    assert_eq!(reloaded.num_glyphs(), font.num_glyphs());
    for ch in ('A'..='Z').chain('a'..='z') {
        assert_eq!(reloaded.side_bearings(ch), font.side_bearings(ch), "{ch}");
    }
    assert_eq!(
        reloaded.glyph_for_char(' ').unwrap().advance_width(),
        250.0
    );
}

#[test]
fn respacing_is_idempotent() {
    let settings = SpacingSettings::new(masters());
    let mut font = FontDocument::load(&latin_font()).unwrap();
    font.apply(SpacingMethod::Proportional, &settings);
    let report = font.apply(SpacingMethod::Proportional, &settings);
    for (ch, outcome) in report.iter() {
        assert!(
            matches!(
                outcome,
                Outcome::Missing | Outcome::Adjusted(Adjustment::Unchanged)
            ),
            "{ch}: {outcome:?}"
        );
    }
}

#[test]
fn layout_tables_do_not_survive() {
    let data = latin_fixture()
        .table(Tag::new(b"GSUB"), vec![0; 16])
        .table(Tag::new(b"GPOS"), vec![0; 16])
        .table(Tag::new(b"kern"), vec![0; 16])
        .build();
    let mut font = FontDocument::load(&data).unwrap();
    let out = font.export("Spacing Test").unwrap();
    let reloaded = FontDocument::parse(&out).unwrap();
    let tags = reloaded.table_tags().collect::<Vec<_>>();
    for tag in [b"GSUB", b"GPOS", b"kern", b"VOID"] {
        let tag = Tag::new(tag);
        assert!(!tags.contains(&tag), "{tag}");
    }
}

#[test]
fn settings_from_json() {
    let json = r#"{
        "topological": {
            "masters": {
                "H": { "lsb": 80, "rsb": 80 },
                "O": { "lsb": 70, "rsb": 70 },
                "n": { "lsb": 40, "rsb": 35 },
                "o": { "lsb": 45, "rsb": 45 }
            },
            "overrides": { "V": { "lsb": 2, "rsb": null } }
        }
    }"#;
    let config = SpacingConfig::from_json(json).unwrap();
    assert!(config.proportional.is_none());
    let settings = config.topological.unwrap();

    let mut font = FontDocument::load(&latin_font()).unwrap();
    font.apply(SpacingMethod::Topological, &settings);
    // vertex sides get half the stem; the override moves the outline and
    // keeps the advance
    assert_eq!(font.side_bearings('V'), Some(SideBearings::new(2.0, 78.0)));
    assert_eq!(font.side_bearings('W'), Some(SideBearings::new(40.0, 40.0)));
}

#[test]
fn metrics_are_measured_from_outlines() {
    let font = FontDocument::load(&latin_font()).unwrap();
    let metrics = font.metrics();
    assert_eq!(metrics.ascender, 720.0);
    assert_eq!(metrics.descender, -200.0);
    assert_eq!(metrics.x_height, 500.0);
    assert_eq!(metrics.cap_height, 700.0);
    assert_eq!(metrics.units_per_em, 1000);
}

fn count_elements(font: &FontDocument, ch: char, pred: impl Fn(&PathEl) -> bool) -> usize {
    let glyph = font.glyph_for_char(ch).unwrap();
    glyph.path().elements().iter().filter(|el| pred(el)).count()
}

#[test]
fn cff_input_is_written_as_truetype() {
    let data = latin_fixture().cff().build();
    let mut font = FontDocument::load(&data).unwrap();
    assert_eq!(font.num_glyphs(), 62);
    assert_eq!(font.side_bearings('O'), Some(SideBearings::new(50.0, 50.0)));
    assert_eq!(
        count_elements(&font, 'O', |el| matches!(el, PathEl::CurveTo(..))),
        4
    );

    font.apply(SpacingMethod::Topological, &SpacingSettings::new(masters()));
    let out = font.export("Spacing Test").unwrap();

    let directory = TableDirectory::new(&out).unwrap();
    for tag in [b"CFF ", b"VORG"] {
        assert!(directory.table_data(Tag::new(tag)).is_none());
    }
    assert!(directory.table_data(Tag::new(b"glyf")).is_some());
    assert!(directory.table_data(Tag::new(b"loca")).is_some());
    let maxp = directory.table_data(Tag::new(b"maxp")).unwrap();
    assert_eq!(maxp.len(), 32);
    assert_eq!(maxp[..4], [0u8, 1, 0, 0]);

    let reloaded = FontDocument::parse(&out).unwrap();
    assert_eq!(reloaded.num_glyphs(), font.num_glyphs());
    assert_eq!(
        count_elements(&reloaded, 'O', |el| matches!(el, PathEl::CurveTo(..))),
        0
    );
    assert!(count_elements(&reloaded, 'O', |el| matches!(el, PathEl::QuadTo(..))) >= 4);
    for ch in ('A'..='Z').chain('a'..='z').filter(|ch| *ch != 'O') {
        assert_eq!(reloaded.side_bearings(ch), font.side_bearings(ch), "{ch}");
    }
    // curves are approximated within a unit
    let (expected, actual) = (
        font.side_bearings('O').unwrap(),
        reloaded.side_bearings('O').unwrap(),
    );
    assert!((expected.lsb - actual.lsb).abs() <= 1.0, "{actual:?}");
    assert!((expected.rsb - actual.rsb).abs() <= 1.0, "{actual:?}");
}

#[test]
fn composite_glyphs_are_flattened() {
    let fixture = latin_fixture();
    let base = fixture.glyph_index("A").unwrap();
    let mark = fixture.glyphs.len() as u16;
    let data = fixture
        .glyph(
            GlyphSpec::new("circumflexcomb", 0x302)
                .advance(0)
                .rect(250, 750, 350, 850),
        )
        .glyph(
            GlyphSpec::new("Acircumflex", 'Â' as u32)
                .advance(600)
                .component(base, 0, 0)
                .component(mark, 0, 0),
        )
        .build();

    let mut font = FontDocument::load(&data).unwrap();
    assert_eq!(font.num_glyphs(), 64);
    let composite = font.glyph_for_char('Â').unwrap();
    let bounds = composite.bounds().unwrap();
    assert_eq!((bounds.x0, bounds.y0, bounds.x1, bounds.y1), (60.0, 0.0, 540.0, 850.0));
    assert_eq!(
        count_elements(&font, 'Â', |el| matches!(el, PathEl::MoveTo(..))),
        2
    );
    assert_eq!(font.side_bearings('Â'), Some(SideBearings::new(60.0, 60.0)));

    font.apply(SpacingMethod::Topological, &SpacingSettings::new(masters()));
    let mark_bearings = font.glyph_for_char('\u{302}').unwrap().side_bearings();
    let reloaded = reload(&mut font);
    assert_eq!(reloaded.num_glyphs(), 64);
    assert_eq!(reloaded.side_bearings('Â'), Some(SideBearings::new(40.0, 40.0)));
    assert_eq!(reloaded.side_bearings('Â'), reloaded.side_bearings('A'));
    assert_eq!(
        reloaded.glyph_for_char('\u{302}').unwrap().side_bearings(),
        mark_bearings
    );
    assert_eq!(
        count_elements(&reloaded, 'Â', |el| matches!(el, PathEl::MoveTo(..))),
        2
    );
}
