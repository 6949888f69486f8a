//! Trivia catalog and level progression
//!
//! Six categories unlock in order, five answered questions apart. After thirty
//! answers the game switches permanently to `Unlimited`, which samples from all
//! categories.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Answered-question count at which the game is won and `Unlimited` begins
pub const WIN_THRESHOLD: u32 = 30;

/// Answered-question counts that unlock each level (the last entry is `Unlimited`)
const UNLOCK_THRESHOLDS: [u32; 7] = [0, 5, 10, 15, 20, 25, WIN_THRESHOLD];

/// Question category; declaration order is progression order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    TypeCoercion,
    TruthyFalsy,
    Equality,
    Typeof,
    Arrays,
    Objects,
    /// Terminal tier drawing from every real category
    Unlimited,
}

impl Category {
    /// The six playable categories in unlock order
    pub const ORDER: [Category; 6] = [
        Category::TypeCoercion,
        Category::TruthyFalsy,
        Category::Equality,
        Category::Typeof,
        Category::Arrays,
        Category::Objects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TypeCoercion => "type-coercion",
            Category::TruthyFalsy => "truthy-falsy",
            Category::Equality => "equality",
            Category::Typeof => "typeof",
            Category::Arrays => "arrays",
            Category::Objects => "objects",
            Category::Unlimited => "unlimited",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "type-coercion" => Some(Category::TypeCoercion),
            "truthy-falsy" => Some(Category::TruthyFalsy),
            "equality" => Some(Category::Equality),
            "typeof" => Some(Category::Typeof),
            "arrays" => Some(Category::Arrays),
            "objects" => Some(Category::Objects),
            "unlimited" => Some(Category::Unlimited),
            _ => None,
        }
    }

    /// Name shown in level-up notifications
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::TypeCoercion => "Type Coercion",
            Category::TruthyFalsy => "Truthy/Falsy",
            Category::Equality => "Equality Quirks",
            Category::Typeof => "typeof Surprises",
            Category::Arrays => "Array Methods",
            Category::Objects => "Objects",
            Category::Unlimited => "UNLIMITED!",
        }
    }

    /// Short tag drawn above the expression block
    pub fn tag(&self) -> &'static str {
        match self {
            Category::TypeCoercion => "TYPE COERCION",
            Category::TruthyFalsy => "TRUTHY/FALSY",
            Category::Equality => "EQUALITY",
            Category::Typeof => "TYPEOF",
            Category::Arrays => "ARRAYS",
            Category::Objects => "OBJECTS",
            Category::Unlimited => "UNLIMITED",
        }
    }

    /// Zero-based level index (`Unlimited` is level 6)
    pub fn level(&self) -> usize {
        match self {
            Category::TypeCoercion => 0,
            Category::TruthyFalsy => 1,
            Category::Equality => 2,
            Category::Typeof => 3,
            Category::Arrays => 4,
            Category::Objects => 5,
            Category::Unlimited => 6,
        }
    }
}

/// Canonical catalog entry. Never handed out directly; draws return an owned [`Question`].
#[derive(Debug, Clone, Copy)]
pub struct QuestionSpec {
    pub expression: &'static str,
    pub correct: &'static str,
    pub category: Category,
    pub difficulty: u8,
    pub explanation: &'static str,
}

impl QuestionSpec {
    pub fn to_question(&self) -> Question {
        Question {
            expression: self.expression.to_string(),
            correct: self.correct.to_string(),
            category: self.category,
            difficulty: self.difficulty,
            explanation: self.explanation.to_string(),
        }
    }
}

/// A drawn question (value copy of a catalog entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// JavaScript expression shown on the block
    pub expression: String,
    /// Correct answer as a JS literal (`"53"`, `42`, `true`)
    pub correct: String,
    pub category: Category,
    /// 1..=6, matches the category's level
    pub difficulty: u8,
    /// Shown in learn mode after the answer resolves
    pub explanation: String,
}

const fn q(
    expression: &'static str,
    correct: &'static str,
    category: Category,
    difficulty: u8,
    explanation: &'static str,
) -> QuestionSpec {
    QuestionSpec {
        expression,
        correct,
        category,
        difficulty,
        explanation,
    }
}

const TYPE_COERCION: &[QuestionSpec] = &[
    q(r#""5" + 3"#, r#""53""#, Category::TypeCoercion, 1,
        r#"When + has a string operand, JS converts the other value to a string and concatenates. "5" + 3 → "5" + "3" → "53""#),
    q(r#"5 + "3""#, r#""53""#, Category::TypeCoercion, 1,
        r#"The + operator prefers string concatenation. If either side is a string, both become strings: 5 + "3" → "5" + "3" → "53""#),
    q(r#""5" - 3"#, "2", Category::TypeCoercion, 1,
        r#"Unlike +, the - operator only works with numbers. JS converts the string to a number first: "5" - 3 → 5 - 3 → 2"#),
    q(r#""5" * "2""#, "10", Category::TypeCoercion, 1,
        r#"Multiplication (*), division (/), and subtraction (-) all convert strings to numbers: "5" * "2" → 5 * 2 → 10"#),
    q(r#""10" / 2"#, "5", Category::TypeCoercion, 1,
        r#"Division converts strings to numbers automatically: "10" / 2 → 10 / 2 → 5"#),
    q(r#""5" - "2""#, "3", Category::TypeCoercion, 1,
        r#"Both strings are converted to numbers for subtraction: "5" - "2" → 5 - 2 → 3"#),
    q(r#"5 + 3 + "2""#, r#""82""#, Category::TypeCoercion, 1,
        r#"Operators evaluate left-to-right. First 5+3=8 (both numbers), then 8+"2"="82" (string concatenation kicks in)"#),
    q(r#""5" + 3 + 2"#, r#""532""#, Category::TypeCoercion, 1,
        r#"Once a string appears, everything after concatenates: "5"+3="53", then "53"+2="532". The string "infects" the rest!"#),
    q(r#"+"42""#, "42", Category::TypeCoercion, 1,
        r#"The unary + operator converts its operand to a number. It's a quick way to convert strings: +"42" → 42"#),
    q(r#"4 + 5 + "px""#, r#""9px""#, Category::TypeCoercion, 1,
        r#"Common in CSS! Numbers add first (4+5=9), then string concatenation: 9+"px"="9px". Useful for building CSS values."#),
];

const TRUTHY_FALSY: &[QuestionSpec] = &[
    q(r#"Boolean("")"#, "false", Category::TruthyFalsy, 2,
        r#"JS has 6 falsy values: false, 0, "", null, undefined, NaN. Empty string "" is one of them!"#),
    q("Boolean(0)", "false", Category::TruthyFalsy, 2,
        "Zero is falsy! The only falsy number. All other numbers (including negative) are truthy."),
    q("Boolean([])", "true", Category::TruthyFalsy, 2,
        "Surprise! Empty arrays [] are truthy. ALL objects are truthy in JS, even empty ones. Arrays are objects."),
    q("Boolean({})", "true", Category::TruthyFalsy, 2,
        "Empty objects {} are truthy! This catches many developers off guard. Objects are always truthy."),
    q(r#"Boolean("false")"#, "true", Category::TruthyFalsy, 2,
        r#"Gotcha! The STRING "false" is truthy because it's a non-empty string. Only "" is falsy."#),
    q(r#"Boolean("0")"#, "true", Category::TruthyFalsy, 2,
        r#"The STRING "0" is truthy! Don't confuse with the NUMBER 0 which is falsy. "0".length > 0, so it's truthy."#),
    q(r#"!!"hello""#, "true", Category::TruthyFalsy, 2,
        r#"!! is the "double bang" - a common trick to convert any value to boolean. !!"hello" → !false → true"#),
    q("!!null", "false", Category::TruthyFalsy, 2,
        "null is falsy. !!null → !true → false. Use !! to quickly check if a value is truthy or falsy."),
    q("!!undefined", "false", Category::TruthyFalsy, 2,
        "undefined is falsy. Variables that haven't been assigned are undefined and thus falsy."),
    q("Boolean(NaN)", "false", Category::TruthyFalsy, 2,
        r#"NaN (Not a Number) is falsy. It's the result of invalid math like 0/0 or parseInt("hello")."#),
    q("Boolean(-1)", "true", Category::TruthyFalsy, 2,
        "All non-zero numbers are truthy! -1, 0.001, Infinity - all truthy. Only 0 is falsy."),
    q(r#"Boolean(" ")"#, "true", Category::TruthyFalsy, 2,
        r#"A space is still a character! " " has length 1, so it's not empty and therefore truthy."#),
];

const EQUALITY: &[QuestionSpec] = &[
    q("null == undefined", "true", Category::Equality, 3,
        r#"Special rule: null and undefined are == to each other, but nothing else. This is actually useful for checking "no value"."#),
    q("null === undefined", "false", Category::Equality, 3,
        r#"=== checks type AND value. null is type "object", undefined is type "undefined". Different types = false."#),
    q("[] == false", "true", Category::Equality, 3,
        r#"Wild coercion chain: [] → "" (toString) → 0 (toNumber). false → 0. So 0 == 0 is true!"#),
    q("[] == ![]", "true", Category::Equality, 3,
        "Famous JS quirk! ![] is false (arrays are truthy, negated = false). Then [] == false triggers coercion: both become 0."),
    q(r#""0" == 0"#, "true", Category::Equality, 3,
        r#"Loose == converts string to number when comparing with number. "0" → 0, then 0 == 0. Use === to avoid this!"#),
    q(r#""0" === 0"#, "false", Category::Equality, 3,
        "=== (strict equality) never coerces types. String !== Number, so false. Always prefer === in real code!"),
    q(r#"false == "0""#, "true", Category::Equality, 3,
        r#"Both sides convert to numbers: false → 0, "0" → 0. Then 0 == 0 is true. This is why == is dangerous!"#),
    q(r#"false == """#, "true", Category::Equality, 3,
        r#"Empty string "" and false both convert to 0. This is why if("") works - "" is falsy!"#),
    q("NaN == NaN", "false", Category::Equality, 3,
        "NaN is the only value in JS not equal to itself! Use Number.isNaN() or Object.is() to check for NaN."),
    q(r#""1" == true"#, "true", Category::Equality, 3,
        r#"true converts to 1, "1" converts to 1. 1 == 1 is true. But "true" == true is false! (NaN)"#),
    q(r#""2" == true"#, "false", Category::Equality, 3,
        r#"Gotcha! true becomes 1, "2" becomes 2. 2 != 1, so false. Only "1" == true works, not "2"!"#),
];

const TYPEOF: &[QuestionSpec] = &[
    q("typeof null", r#""object""#, Category::Typeof, 4,
        "Historical bug from JS's first version! null was tagged as object internally. Too late to fix - would break the web."),
    q("typeof []", r#""object""#, Category::Typeof, 4,
        "Arrays ARE objects in JS! typeof can't distinguish them. Use Array.isArray([]) to properly check for arrays."),
    q("typeof NaN", r#""number""#, Category::Typeof, 4,
        r#"Ironic: "Not a Number" has type "number"! NaN represents failed numeric operations, but it's still in the number system."#),
    q("typeof undefined", r#""undefined""#, Category::Typeof, 4,
        "undefined is its own type. Variables declared but not assigned have this value and type."),
    q("typeof function(){}", r#""function""#, Category::Typeof, 4,
        r#"Functions get special treatment! Even though typeof {} is "object", functions return "function". Helpful for checking callbacks."#),
    q("typeof {}", r#""object""#, Category::Typeof, 4,
        r#"Plain objects return "object". But so do arrays and null! typeof is limited for object type checking."#),
    q(r#"typeof "hello""#, r#""string""#, Category::Typeof, 4,
        r#"String primitives return "string". Note: typeof new String("hi") returns "object" (wrapper object)!"#),
    q("typeof 42", r#""number""#, Category::Typeof, 4,
        r#"All numbers (integers, floats, Infinity, NaN) return "number". JS has only one number type."#),
    q("typeof true", r#""boolean""#, Category::Typeof, 4,
        r#"Boolean primitives return "boolean". Only two values: true and false."#),
    q("typeof Symbol()", r#""symbol""#, Category::Typeof, 4,
        "Symbols (ES6+) are unique identifiers. Used for object keys that won't collide with other properties."),
];

const ARRAYS: &[QuestionSpec] = &[
    q("[1,2,3].length", "3", Category::Arrays, 5,
        "The length property returns the count of elements. It's always 1 more than the highest index!"),
    q("[1,2,3][1]", "2", Category::Arrays, 5,
        "Arrays are zero-indexed! Index 0 is first element (1), index 1 is second element (2). Off-by-one errors are super common."),
    q("[1,2,3].pop()", "3", Category::Arrays, 5,
        "pop() removes AND returns the last element. It mutates the original array! After this, the array is [1,2]."),
    q("[1,2,3].shift()", "1", Category::Arrays, 5,
        "shift() removes AND returns the first element. Opposite of pop(). After this, array is [2,3]. Also mutates!"),
    q("[1,2,3].indexOf(2)", "1", Category::Arrays, 5,
        "indexOf finds the first occurrence and returns its index. Returns -1 if not found. Great for checking existence!"),
    q("[1,2,3].includes(2)", "true", Category::Arrays, 5,
        "includes() returns a boolean - cleaner than indexOf !== -1. Added in ES6, prefer this for existence checks."),
    q(r#"[1,2,3].join("-")"#, r#""1-2-3""#, Category::Arrays, 5,
        "join() converts array to string with separator between elements. Default separator is comma. Great for building paths or CSV!"),
    q("[1,2,3].reverse()[0]", "3", Category::Arrays, 5,
        "reverse() reverses IN PLACE (mutates!) and returns the array. Original array is now [3,2,1]. Use [...arr].reverse() to avoid mutation."),
    q("[1,2,3].slice(1).length", "2", Category::Arrays, 5,
        "slice(1) returns a NEW array from index 1 onwards: [2,3]. slice() does NOT mutate - it's safe! Great for copying arrays."),
    q("[...[1,2], 3].length", "3", Category::Arrays, 5,
        r#"The spread operator (...) "unpacks" array elements. [1,2] becomes 1,2 so result is [1,2,3]. Modern way to concat arrays!"#),
    q("[1,2,3].map(x=>x*2)[1]", "4", Category::Arrays, 5,
        "map() transforms each element with a function, returning NEW array. [1,2,3] → [2,4,6]. Index 1 = 4. Does not mutate original!"),
    q("[1,2,3,4].filter(x=>x>2).length", "2", Category::Arrays, 5,
        "filter() keeps elements where callback returns true. x>2 keeps [3,4]. Returns NEW array without mutating. Length = 2."),
    q("[1,2,3].reduce((a,b)=>a+b,0)", "6", Category::Arrays, 5,
        "reduce() accumulates values: starts at 0, then 0+1=1, 1+2=3, 3+3=6. Second arg is initial value. Most powerful array method!"),
];

const OBJECTS: &[QuestionSpec] = &[
    q("{a:1,b:2}.a", "1", Category::Objects, 6,
        r#"Dot notation accesses properties directly. obj.prop is cleaner than obj["prop"] but only works for valid identifier names."#),
    q("Object.keys({a:1,b:2}).length", "2", Category::Objects, 6,
        "Object.keys() returns an array of property NAMES (strings). Great for iterating: Object.keys(obj).forEach(key => ...)"),
    q("Object.values({a:1,b:2})[0]", "1", Category::Objects, 6,
        "Object.values() returns an array of VALUES. Paired with Object.keys() and Object.entries() for different iteration needs."),
    q(r#""a" in {a:1,b:2}"#, "true", Category::Objects, 6,
        r#"The "in" operator checks if property exists (including inherited). Use hasOwnProperty() to check only own properties."#),
    q("{...{a:1},{b:2}}.b", "2", Category::Objects, 6,
        "Object spread (...) copies properties into new object. Modern way to merge objects! Replaces Object.assign()."),
    q(r#"({a:1,b:2}).hasOwnProperty("a")"#, "true", Category::Objects, 6,
        "hasOwnProperty() checks if property exists directly on object, not inherited from prototype. Returns boolean."),
    q("Object.entries({a:1})[0][1]", "1", Category::Objects, 6,
        r#"Object.entries() returns array of [key, value] pairs: [["a",1]]. [0] is first pair, [1] is the value. Great for Object→Map conversion!"#),
    q("({...{a:1,b:2},b:3}).b", "3", Category::Objects, 6,
        r#"When spreading, later properties override earlier ones! Order matters. This is how you do "merge with overrides" in JS."#),
    q("Object.freeze({a:1}).a = 2", "2", Category::Objects, 6,
        r#"Tricky! Assignment EXPRESSION returns 2, but the object is frozen so the assignment silently fails. Use "use strict" to get an error!"#),
    q("delete {a:1,b:2}.a", "true", Category::Objects, 6,
        "delete removes a property and returns true on success. Returns true even if property didn't exist! Only returns false for non-configurable props."),
];
/// Catalog for a category (`Unlimited` has none of its own)
pub fn questions(category: Category) -> &'static [QuestionSpec] {
    match category {
        Category::TypeCoercion => TYPE_COERCION,
        Category::TruthyFalsy => TRUTHY_FALSY,
        Category::Equality => EQUALITY,
        Category::Typeof => TYPEOF,
        Category::Arrays => ARRAYS,
        Category::Objects => OBJECTS,
        Category::Unlimited => &[],
    }
}

/// Draw a question uniformly from `category`.
///
/// `Unlimited` samples in two stages: a category uniformly from [`Category::ORDER`],
/// then a question uniformly from that category. Small categories are therefore
/// overrepresented per question, but every category is equally likely.
pub fn random_question<R: Rng + ?Sized>(category: Category, rng: &mut R) -> Question {
    let category = match category {
        Category::Unlimited => Category::ORDER[rng.random_range(0..Category::ORDER.len())],
        other => other,
    };
    let pool = questions(category);
    pool[rng.random_range(0..pool.len())].to_question()
}

/// Level reached after `questions_answered` answers
pub fn current_category(questions_answered: u32) -> Category {
    if questions_answered >= WIN_THRESHOLD {
        return Category::Unlimited;
    }

    let level = UNLOCK_THRESHOLDS[..Category::ORDER.len()]
        .iter()
        .rposition(|&threshold| questions_answered >= threshold)
        .unwrap_or(0);

    Category::ORDER[level]
}

/// True only at the instant the last level is completed (not for every count past it)
pub fn has_won_game(questions_answered: u32) -> bool {
    questions_answered == WIN_THRESHOLD
}

/// Prefix of [`Category::ORDER`] unlocked so far (always at least one)
pub fn unlocked_categories(questions_answered: u32) -> &'static [Category] {
    let unlocked = UNLOCK_THRESHOLDS[..Category::ORDER.len()]
        .iter()
        .filter(|&&threshold| questions_answered >= threshold)
        .count()
        .max(1);

    &Category::ORDER[..unlocked]
}
