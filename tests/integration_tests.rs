use json_bind::convert::{
    ContainerConverter, DefaultConverter, EnumConverter, FieldsConverter, OwnedConverter,
    TokenDispatch, TokenDispatchConverter, Utf16CharConverter, Utf32CharConverter,
};
use json_bind::{
    from_file, from_file_parallel, from_file_sequential, from_str, json_bind, json_field,
    json_poly, to_file, to_string, Error, Field, FieldSet, JsonFields, JsonValue, Parser,
    PolyConverter, PolyRegistry, Writer,
};
use once_cell::sync::Lazy;

/// Asserts the value encodes to `expected` and that `expected` decodes to
/// something that encodes identically.
fn round_trip<V: JsonValue>(value: &V, expected: &str) {
    assert_eq!(to_string(value).unwrap(), expected);
    let back: V = from_str(expected).unwrap();
    assert_eq!(to_string(&back).unwrap(), expected);
}

// ---------------------------------------------------------------------------
// Polymorphic fields and arrays
// ---------------------------------------------------------------------------

trait Item: json_bind::PolyObject {}

#[derive(Default)]
struct One {
    x: i64,
}

impl JsonFields for One {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<One>> =
            Lazy::new(|| FieldSet::new(vec![json_field!(One, x)]));
        &FIELDS
    }
}
json_poly!(One, "One");
impl Item for One {}

#[derive(Default)]
struct Two {
    s: String,
}

impl JsonFields for Two {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<Two>> =
            Lazy::new(|| FieldSet::new(vec![json_field!(Two, s)]));
        &FIELDS
    }
}
json_poly!(Two, "Two");
impl Item for Two {}

static ITEMS: Lazy<PolyRegistry<dyn Item>> = Lazy::new(|| {
    PolyRegistry::new()
        .register("One", || Box::new(One::default()) as Box<dyn Item>)
        .register("Two", || Box::new(Two::default()) as Box<dyn Item>)
});

#[derive(Default)]
struct Holder {
    item: Option<Box<dyn Item>>,
    arr: Vec<Option<Box<dyn Item>>>,
}

impl JsonFields for Holder {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<Holder>> = Lazy::new(|| {
            FieldSet::new(vec![
                Field::with(
                    "item",
                    |h: &Holder| &h.item,
                    |h: &mut Holder| &mut h.item,
                    PolyConverter::new(&ITEMS),
                ),
                Field::with(
                    "arr",
                    |h: &Holder| &h.arr,
                    |h: &mut Holder| &mut h.arr,
                    ContainerConverter::new(PolyConverter::new(&ITEMS)),
                ),
            ])
        });
        &FIELDS
    }
}
json_bind!(Holder);

#[test]
fn polymorphic_field_round_trips() {
    let holder = Holder {
        item: Some(Box::new(One { x: 42 })),
        arr: Vec::new(),
    };
    round_trip(&holder, "{item:{kind:\"One\",x:42},arr:[]}");
}

#[test]
fn polymorphic_array_mixes_types_and_null() {
    let holder = Holder {
        item: None,
        arr: vec![
            Some(Box::new(One { x: 1 })),
            Some(Box::new(Two { s: "abc".into() })),
            None,
        ],
    };
    round_trip(
        &holder,
        "{item:null,arr:[{kind:\"One\",x:1},{kind:\"Two\",s:\"abc\"},null]}",
    );
}

#[test]
fn unknown_kind_in_array_fails() {
    assert!(matches!(
        from_str::<Holder>("{item:null,arr:[{kind:\"Three\"}]}"),
        Err(Error::UnknownDiscriminant { .. })
    ));
}

#[derive(Default)]
struct TaggedHolder {
    item: Option<Box<dyn Item>>,
    arr: Vec<Option<Box<dyn Item>>>,
}

impl JsonFields for TaggedHolder {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<TaggedHolder>> = Lazy::new(|| {
            FieldSet::new(vec![
                Field::with(
                    "item",
                    |h: &TaggedHolder| &h.item,
                    |h: &mut TaggedHolder| &mut h.item,
                    PolyConverter::new(&ITEMS).with_key("tag"),
                ),
                Field::with(
                    "arr",
                    |h: &TaggedHolder| &h.arr,
                    |h: &mut TaggedHolder| &mut h.arr,
                    ContainerConverter::new(PolyConverter::new(&ITEMS).with_key("tag")),
                ),
            ])
        });
        &FIELDS
    }
}
json_bind!(TaggedHolder);

#[test]
fn custom_discriminator_key_round_trips() {
    let holder = TaggedHolder {
        item: Some(Box::new(One { x: 99 })),
        arr: Vec::new(),
    };
    round_trip(&holder, "{item:{tag:\"One\",x:99},arr:[]}");
}

#[test]
fn custom_discriminator_key_in_array_with_null() {
    let holder = TaggedHolder {
        item: None,
        arr: vec![
            Some(Box::new(One { x: 1 })),
            Some(Box::new(Two { s: "abc".into() })),
            None,
        ],
    };
    round_trip(
        &holder,
        "{item:null,arr:[{tag:\"One\",x:1},{tag:\"Two\",s:\"abc\"},null]}",
    );
}

#[test]
fn default_key_document_misses_custom_discriminator() {
    assert!(matches!(
        from_str::<TaggedHolder>("{item:{kind:\"One\",x:1},arr:[]}"),
        Err(Error::Structural { .. })
    ));
}

// ---------------------------------------------------------------------------
// Integer and float members
// ---------------------------------------------------------------------------

#[derive(Default)]
struct IntegerTypes {
    s: i16,
    us: u16,
    i: i32,
    ui: u32,
    l: i64,
    ul: u64,
    ll: i64,
    ull: u64,
}

impl JsonFields for IntegerTypes {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<IntegerTypes>> = Lazy::new(|| {
            FieldSet::new(vec![
                json_field!(IntegerTypes, s),
                json_field!(IntegerTypes, us),
                json_field!(IntegerTypes, i),
                json_field!(IntegerTypes, ui),
                json_field!(IntegerTypes, l),
                json_field!(IntegerTypes, ul),
                json_field!(IntegerTypes, ll),
                json_field!(IntegerTypes, ull),
            ])
        });
        &FIELDS
    }
}
json_bind!(IntegerTypes);

#[test]
fn integer_members_round_trip() {
    let value = IntegerTypes {
        s: -1000,
        us: 2000,
        i: -3_000_000,
        ui: 4_000_000,
        l: -2_000_000_000,
        ul: 3_000_000_000,
        ll: 1_234_567_890_123_456,
        ull: 9_876_543_210_987_654,
    };
    round_trip(
        &value,
        "{s:-1000,us:2000,i:-3000000,ui:4000000,l:-2000000000,ul:3000000000,\
         ll:1234567890123456,ull:9876543210987654}",
    );
}

#[test]
fn out_of_range_integer_narrows() {
    assert!(matches!(
        from_str::<IntegerTypes>("{s:40000}"),
        Err(Error::TypeNarrowing { .. })
    ));
    assert!(matches!(
        from_str::<IntegerTypes>("{ul:-1}"),
        Err(Error::TypeNarrowing { .. })
    ));
}

#[derive(Default)]
struct FloatTypes {
    f: f32,
    d: f64,
    ld: f64,
}

impl JsonFields for FloatTypes {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<FloatTypes>> = Lazy::new(|| {
            FieldSet::new(vec![
                json_field!(FloatTypes, f),
                json_field!(FloatTypes, d),
                json_field!(FloatTypes, ld),
            ])
        });
        &FIELDS
    }
}
json_bind!(FloatTypes);

#[test]
fn float_members_round_trip() {
    let value = FloatTypes {
        f: 1.5,
        d: -2.75,
        ld: 3.125,
    };
    round_trip(&value, "{f:1.5,d:-2.75,ld:3.125}");
}

// ---------------------------------------------------------------------------
// Character members of fixed code-unit width
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Glyphs {
    c: char,
    c16: u16,
    c32: u32,
}

impl JsonFields for Glyphs {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<Glyphs>> = Lazy::new(|| {
            FieldSet::new(vec![
                json_field!(Glyphs, c),
                Field::with(
                    "c16",
                    |g: &Glyphs| &g.c16,
                    |g: &mut Glyphs| &mut g.c16,
                    Utf16CharConverter,
                ),
                Field::with(
                    "c32",
                    |g: &Glyphs| &g.c32,
                    |g: &mut Glyphs| &mut g.c32,
                    Utf32CharConverter,
                ),
            ])
        });
        &FIELDS
    }
}
json_bind!(Glyphs);

#[test]
fn character_members_escape_non_ascii() {
    let value = Glyphs {
        c: 'A',
        c16: 0x30A2,
        c32: 0xE9,
    };
    round_trip(&value, "{c:\"A\",c16:\"\\u30a2\",c32:\"\\u00e9\"}");
}

#[test]
fn surrogate_pair_does_not_fit_sixteen_bits() {
    assert!(matches!(
        from_str::<Glyphs>(r#"{c16:"\ud83c\udf89"}"#),
        Err(Error::TypeNarrowing { .. })
    ));
    let value: Glyphs = from_str(r#"{c32:"\ud83c\udf89"}"#).unwrap();
    assert_eq!(value.c32, 0x1F389);
}

// ---------------------------------------------------------------------------
// Nested objects
// ---------------------------------------------------------------------------

#[derive(Default, Debug, PartialEq)]
struct Child {
    value: i32,
    name: String,
}

impl JsonFields for Child {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<Child>> = Lazy::new(|| {
            FieldSet::new(vec![
                json_field!(Child, value),
                json_field!(Child, name),
            ])
        });
        &FIELDS
    }
}
json_bind!(Child);

#[derive(Default)]
struct Parent {
    child: Child,
    flag: bool,
}

impl JsonFields for Parent {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<Parent>> = Lazy::new(|| {
            FieldSet::new(vec![
                json_field!(Parent, child),
                json_field!(Parent, flag),
            ])
        });
        &FIELDS
    }
}
json_bind!(Parent);

#[test]
fn nested_object_round_trips() {
    let value = Parent {
        child: Child {
            value: 42,
            name: "test".into(),
        },
        flag: true,
    };
    round_trip(&value, "{child:{value:42,name:\"test\"},flag:true}");
}

// ---------------------------------------------------------------------------
// Field-set composition over an embedded base
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Common {
    w: bool,
    x: i32,
}

impl Default for Common {
    fn default() -> Self {
        Common { w: true, x: 1 }
    }
}

impl JsonFields for Common {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<Common>> = Lazy::new(|| {
            FieldSet::new(vec![
                json_field!(Common, w),
                json_field!(Common, x),
            ])
        });
        &FIELDS
    }
}
json_bind!(Common);

// Re-lists `w` from the embedded base next to its own member, and leaves
// `x` out of the set entirely.
#[derive(Default, Debug, PartialEq)]
struct Extended {
    base: Common,
    y: f32,
}

impl JsonFields for Extended {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<Extended>> = Lazy::new(|| {
            FieldSet::new(vec![
                Field::new(
                    "w",
                    |e: &Extended| &e.base.w,
                    |e: &mut Extended| &mut e.base.w,
                ),
                json_field!(Extended, y),
            ])
        });
        &FIELDS
    }
}
json_bind!(Extended);

#[test]
fn composed_field_set_projects_into_embedded_base() {
    let value = Extended {
        base: Common { w: false, x: 1 },
        y: 2.5,
    };
    round_trip(&value, "{w:false,y:2.5}");
}

#[test]
fn unlisted_base_member_is_ignored_on_read() {
    let value: Extended = from_str("{w:false,x:9,y:2.5}").unwrap();
    assert!(!value.base.w);
    // `x` is not part of Extended's set, so the key is skipped and the
    // member keeps its default.
    assert_eq!(value.base.x, 1);
    assert_eq!(value.y, 2.5);
}

// ---------------------------------------------------------------------------
// Nullable ownership
// ---------------------------------------------------------------------------

#[derive(Default)]
struct PointerHolder {
    ptr: Option<Box<i32>>,
    ptr_vec: Vec<Option<Box<String>>>,
}

impl JsonFields for PointerHolder {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<PointerHolder>> = Lazy::new(|| {
            FieldSet::new(vec![
                json_field!(PointerHolder, ptr),
                Field::with(
                    "ptrVec",
                    |h: &PointerHolder| &h.ptr_vec,
                    |h: &mut PointerHolder| &mut h.ptr_vec,
                    ContainerConverter::new(OwnedConverter::new(
                        DefaultConverter::<String>::new(),
                    )),
                ),
            ])
        });
        &FIELDS
    }
}
json_bind!(PointerHolder);

#[test]
fn nullable_members_round_trip() {
    let value = PointerHolder {
        ptr: Some(Box::new(999)),
        ptr_vec: vec![
            Some(Box::new("first".to_string())),
            None,
            Some(Box::new("third".to_string())),
        ],
    };
    round_trip(&value, "{ptr:999,ptrVec:[\"first\",null,\"third\"]}");
}

// ---------------------------------------------------------------------------
// Token-directed union member
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Scalar {
    Text(String),
    Number(i64),
    Flag(bool),
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Number(0)
    }
}

struct ScalarDispatch;

impl TokenDispatch for ScalarDispatch {
    type Value = Scalar;

    fn read_string(&self, parser: &mut Parser) -> json_bind::Result<Scalar> {
        Ok(Scalar::Text(parser.read_string()?))
    }

    fn read_integer(&self, parser: &mut Parser) -> json_bind::Result<Scalar> {
        Ok(Scalar::Number(parser.read_integer()?))
    }

    fn read_bool(&self, parser: &mut Parser) -> json_bind::Result<Scalar> {
        Ok(Scalar::Flag(parser.read_bool()?))
    }

    fn write(&self, writer: &mut Writer, value: &Scalar) -> json_bind::Result<()> {
        match value {
            Scalar::Text(s) => writer.string(s),
            Scalar::Number(n) => writer.integer(*n),
            Scalar::Flag(b) => writer.boolean(*b),
        }
        Ok(())
    }
}

#[derive(Default)]
struct ScalarHolder {
    value: Scalar,
}

impl JsonFields for ScalarHolder {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<ScalarHolder>> = Lazy::new(|| {
            FieldSet::new(vec![Field::with(
                "value",
                |h: &ScalarHolder| &h.value,
                |h: &mut ScalarHolder| &mut h.value,
                TokenDispatchConverter::new(ScalarDispatch),
            )])
        });
        &FIELDS
    }
}
json_bind!(ScalarHolder);

#[test]
fn union_member_follows_token_kind() {
    round_trip(
        &ScalarHolder {
            value: Scalar::Text("hello".into()),
        },
        "{value:\"hello\"}",
    );
    round_trip(
        &ScalarHolder {
            value: Scalar::Number(42),
        },
        "{value:42}",
    );
    round_trip(
        &ScalarHolder {
            value: Scalar::Flag(true),
        },
        "{value:true}",
    );
    round_trip(
        &ScalarHolder {
            value: Scalar::Flag(false),
        },
        "{value:false}",
    );
}

#[test]
fn union_member_rejects_unhandled_token() {
    assert!(matches!(
        from_str::<ScalarHolder>("{value:[1]}"),
        Err(Error::Structural { .. })
    ));
}

// ---------------------------------------------------------------------------
// Hand-written JsonValue escape hatch
// ---------------------------------------------------------------------------

#[derive(Default, Debug, PartialEq)]
struct Custom {
    value: i32,
    name: String,
}

impl JsonValue for Custom {
    fn read_json(parser: &mut Parser) -> json_bind::Result<Self> {
        let mut out = Custom::default();
        parser.start_object()?;
        while !parser.next_is_end_object() {
            match parser.next_key()?.as_str() {
                "value" => out.value = parser.read_integer()?,
                "name" => out.name = parser.read_string()?,
                _ => parser.skip_value()?,
            }
        }
        parser.end_object()?;
        Ok(out)
    }

    fn write_json(&self, writer: &mut Writer) -> json_bind::Result<()> {
        writer.start_object();
        writer.key("value");
        writer.integer(i64::from(self.value));
        writer.key("name");
        writer.string(&self.name);
        writer.end_object();
        Ok(())
    }
}

#[test]
fn hand_written_value_round_trips() {
    let value = Custom {
        value: 42,
        name: "test".into(),
    };
    round_trip(&value, "{value:42,name:\"test\"}");

    let parsed: Custom = from_str("{value:123,name:\"hello\"}").unwrap();
    assert_eq!(
        parsed,
        Custom {
            value: 123,
            name: "hello".into()
        }
    );
}

#[test]
fn hand_written_value_reads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json5");
    std::fs::write(&path, "{value:999,name:\"from_file\"}").unwrap();

    let value: Custom = from_file(&path).unwrap();
    assert_eq!(
        value,
        Custom {
            value: 999,
            name: "from_file".into()
        }
    );
}

// ---------------------------------------------------------------------------
// Container members
// ---------------------------------------------------------------------------

#[derive(Default, Debug, PartialEq)]
struct Tag {
    label: String,
    priority: i32,
}

impl JsonFields for Tag {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<Tag>> = Lazy::new(|| {
            FieldSet::new(vec![
                json_field!(Tag, label),
                json_field!(Tag, priority),
            ])
        });
        &FIELDS
    }
}
json_bind!(Tag);

#[derive(Default)]
struct TagList {
    tags: Vec<Tag>,
}

impl JsonFields for TagList {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<TagList>> =
            Lazy::new(|| FieldSet::new(vec![json_field!(TagList, tags)]));
        &FIELDS
    }
}
json_bind!(TagList);

#[test]
fn object_vector_round_trips() {
    let value = TagList {
        tags: vec![
            Tag {
                label: "first".into(),
                priority: 1,
            },
            Tag {
                label: "second".into(),
                priority: 2,
            },
            Tag {
                label: "third".into(),
                priority: 3,
            },
        ],
    };
    round_trip(
        &value,
        "{tags:[{label:\"first\",priority:1},{label:\"second\",priority:2},\
         {label:\"third\",priority:3}]}",
    );
    round_trip(&TagList { tags: Vec::new() }, "{tags:[]}");
}

#[derive(Default)]
struct TagSet {
    tags: std::collections::BTreeSet<String>,
}

impl JsonFields for TagSet {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<TagSet>> =
            Lazy::new(|| FieldSet::new(vec![json_field!(TagSet, tags)]));
        &FIELDS
    }
}
json_bind!(TagSet);

#[test]
fn set_member_writes_sorted() {
    let mut value = TagSet::default();
    value.tags.insert("gamma".into());
    value.tags.insert("alpha".into());
    value.tags.insert("beta".into());
    round_trip(&value, "{tags:[\"alpha\",\"beta\",\"gamma\"]}");
    round_trip(&TagSet::default(), "{tags:[]}");
}

// ---------------------------------------------------------------------------
// Explicit element converters
// ---------------------------------------------------------------------------

#[derive(Default, Debug, PartialEq, Clone)]
struct Element {
    x: i32,
}

impl JsonFields for Element {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<Element>> =
            Lazy::new(|| FieldSet::new(vec![json_field!(Element, x)]));
        &FIELDS
    }
}
json_bind!(Element);

#[derive(Default)]
struct ElementList {
    v: Vec<Element>,
}

impl JsonFields for ElementList {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<ElementList>> = Lazy::new(|| {
            FieldSet::new(vec![Field::with(
                "v",
                |h: &ElementList| &h.v,
                |h: &mut ElementList| &mut h.v,
                ContainerConverter::new(FieldsConverter::<Element>::new()),
            )])
        });
        &FIELDS
    }
}
json_bind!(ElementList);

#[test]
fn explicit_element_converter_round_trips() {
    let value = ElementList {
        v: vec![Element { x: 11 }],
    };
    round_trip(&value, "{v:[{x:11}]}");
}

#[derive(Default)]
struct NestedList {
    v: Vec<Vec<Element>>,
}

impl JsonFields for NestedList {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<NestedList>> = Lazy::new(|| {
            let inner: ContainerConverter<Vec<Element>, _> =
                ContainerConverter::new(FieldsConverter::<Element>::new());
            FieldSet::new(vec![Field::with(
                "v",
                |h: &NestedList| &h.v,
                |h: &mut NestedList| &mut h.v,
                ContainerConverter::new(inner),
            )])
        });
        &FIELDS
    }
}
json_bind!(NestedList);

#[test]
fn nested_container_converters_compose() {
    let value = NestedList {
        v: vec![vec![Element { x: 1 }, Element { x: 2 }]],
    };
    round_trip(&value, "{v:[[{x:1},{x:2}]]}");
}

#[derive(Default)]
struct BoxedElement {
    item: Option<Box<Element>>,
}

impl JsonFields for BoxedElement {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<BoxedElement>> = Lazy::new(|| {
            FieldSet::new(vec![Field::with(
                "item",
                |h: &BoxedElement| &h.item,
                |h: &mut BoxedElement| &mut h.item,
                OwnedConverter::new(FieldsConverter::<Element>::new()),
            )])
        });
        &FIELDS
    }
}
json_bind!(BoxedElement);

#[test]
fn owned_element_converter_round_trips() {
    let value = BoxedElement {
        item: Some(Box::new(Element { x: 21 })),
    };
    round_trip(&value, "{item:{x:21}}");
}

// ---------------------------------------------------------------------------
// Enum members
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Debug)]
enum Color {
    Red,
    Green,
    Blue,
}

impl Default for Color {
    fn default() -> Self {
        Color::Red
    }
}

fn color_converter() -> EnumConverter<Color> {
    EnumConverter::new(&[
        (Color::Red, "red"),
        (Color::Green, "green"),
        (Color::Blue, "blue"),
    ])
}

#[derive(Default)]
struct Palette {
    color: Color,
}

impl JsonFields for Palette {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<Palette>> = Lazy::new(|| {
            FieldSet::new(vec![Field::required_with(
                "color",
                |p: &Palette| &p.color,
                |p: &mut Palette| &mut p.color,
                color_converter(),
            )])
        });
        &FIELDS
    }
}
json_bind!(Palette);

#[test]
fn enum_member_round_trips() {
    round_trip(
        &Palette {
            color: Color::Green,
        },
        "{color:\"green\"}",
    );
}

#[test]
fn unknown_enum_label_fails() {
    assert!(matches!(
        from_str::<Palette>("{color:\"purple\"}"),
        Err(Error::UnknownDiscriminant { .. })
    ));
}

#[derive(Default)]
struct ColorList {
    v: Vec<Color>,
}

impl JsonFields for ColorList {
    fn json_fields() -> &'static FieldSet<Self> {
        static FIELDS: Lazy<FieldSet<ColorList>> = Lazy::new(|| {
            FieldSet::new(vec![Field::with(
                "v",
                |h: &ColorList| &h.v,
                |h: &mut ColorList| &mut h.v,
                ContainerConverter::new(EnumConverter::new(&[
                    (Color::Red, "Red"),
                    (Color::Blue, "Blue"),
                ])),
            )])
        });
        &FIELDS
    }
}
json_bind!(ColorList);

#[test]
fn enum_container_round_trips() {
    let value = ColorList {
        v: vec![Color::Red, Color::Blue],
    };
    round_trip(&value, "{v:[\"Red\",\"Blue\"]}");
}

// ---------------------------------------------------------------------------
// File strategies
// ---------------------------------------------------------------------------

#[test]
fn parallel_and_sequential_reads_agree() {
    let numbers: Vec<i64> = (0..40_000).map(|n| n * 7 - 1000).collect();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.json5");
    to_file(&path, &numbers).unwrap();
    // Document is large enough that the auto policy picks the parallel path.
    assert!(std::fs::metadata(&path).unwrap().len() > 128 * 1024);

    let sequential: Vec<i64> = from_file_sequential(&path).unwrap();
    let parallel: Vec<i64> = from_file_parallel(&path).unwrap();
    let auto: Vec<i64> = from_file(&path).unwrap();
    assert_eq!(sequential, numbers);
    assert_eq!(parallel, numbers);
    assert_eq!(auto, numbers);
}

#[test]
fn trailing_commas_are_tolerated_on_read() {
    let value: TagList = from_str("{tags:[{label:\"a\",priority:1,},],}").unwrap();
    assert_eq!(value.tags.len(), 1);
    assert_eq!(value.tags[0].label, "a");
}

#[test]
fn quoted_keys_are_accepted_on_read() {
    let value: Child = from_str("{\"value\":7,\"name\":\"q\"}").unwrap();
    assert_eq!(
        value,
        Child {
            value: 7,
            name: "q".into()
        }
    );
}
