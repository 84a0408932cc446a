//! Program fixtures

use jscallgraph_core::features::program::{Program, ProgramBuilder};
use std::path::PathBuf;

/// Path of a file under `tests/fixtures/`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// ```js
/// function f() {}
/// var a = {}; a.m = f;
/// var b = {}; b.m = f;
/// a.m();   // pc 6
/// b.m();   // pc 8
/// ```
pub fn fixture_two_receivers() -> Program {
    let mut builder = ProgramBuilder::new("app.js");
    let main = builder.script();
    let f = builder.declare("f");
    builder.define(f, |b| {
        let this = b.this();
        b.ret(Some(this));
    });
    builder.define(main, |b| {
        let closure = b.closure(f);
        let a = b.new_object();
        b.put(a, "m", closure);
        let other = b.new_object();
        b.put(other, "m", closure);
        b.invoke_property(a, "m", &[]);
        b.invoke_property(other, "m", &[]);
    });
    builder.build().expect("valid fixture")
}

/// `f` is one of two functions; called directly or via `call`/`apply` with receiver `r`
///
/// ```js
/// function g(x) {}  function h(x) {}
/// var f = cond ? g : h;  var r = {};  var x = {};
/// f(x);  OR  f.call(r, x);  OR  f.apply(r, [x]);
/// ```
pub fn fixture_dispatch(style: DispatchStyle) -> Program {
    let mut builder = ProgramBuilder::new("dispatch.js");
    let main = builder.script();
    let g = builder.declare("g");
    let h = builder.declare("h");
    for function in [g, h] {
        builder.define(function, |b| {
            b.param();
        });
    }
    builder.define(main, |b| {
        let first = b.closure(g);
        let second = b.closure(h);
        let f = b.phi(&[first, second]);
        let receiver = b.new_object();
        let x = b.new_object();
        match style {
            DispatchStyle::Direct => {
                b.call(f, &[x]);
            }
            DispatchStyle::Call => {
                b.invoke_property(f, "call", &[receiver, x]);
            }
            DispatchStyle::Apply => {
                let args = b.new_array();
                b.put(args, "0", x);
                b.invoke_property(f, "apply", &[receiver, args]);
            }
        }
    });
    builder.build().expect("valid fixture")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStyle {
    Direct,
    Call,
    Apply,
}

/// `main` calls `f0`, each `fi` calls `f(i+1)` through a global, `n` functions in all
pub fn fixture_call_chain(n: usize) -> Program {
    let mut builder = ProgramBuilder::new("chain.js");
    let main = builder.script();
    let functions: Vec<_> = (0..n).map(|i| builder.declare(&format!("f{}", i))).collect();

    for (i, &function) in functions.iter().enumerate() {
        builder.define(function, |b| {
            if i + 1 < n {
                let next = b.global_read(&format!("f{}", i + 1));
                b.call(next, &[]);
                b.call(next, &[]);
            }
        });
    }
    builder.define(main, |b| {
        for (i, &function) in functions.iter().enumerate() {
            let closure = b.closure(function);
            b.global_write(&format!("f{}", i), closure);
        }
        if n > 0 {
            let first = b.global_read("f0");
            b.call(first, &[]);
        }
    });
    builder.build().expect("valid fixture")
}

/// Constructor with a prototype method, instantiated at two sites
///
/// ```js
/// function C() { this.self = this; }
/// C.prototype.run = function run() {};
/// var a = new C();  var b = new C();
/// a.run();
/// ```
pub fn fixture_constructor() -> Program {
    let mut builder = ProgramBuilder::new("ctor.js");
    let main = builder.script();
    let c = builder.declare("C");
    let run = builder.declare("run");
    builder.define(c, |b| {
        let this = b.this();
        b.put(this, "self", this);
    });
    builder.define(run, |_| {});
    builder.define(main, |b| {
        let ctor = b.closure(c);
        let proto = b.get(ctor, "prototype");
        let method = b.closure(run);
        b.put(proto, "run", method);
        let a = b.construct(ctor, &[]);
        b.construct(ctor, &[]);
        b.invoke_property(a, "run", &[]);
    });
    builder.build().expect("valid fixture")
}

/// Closure reading a function from its enclosing scope
///
/// ```js
/// function outer() { var helper = function helper() {}; return function inner() { helper(); }; }
/// outer()();
/// ```
pub fn fixture_lexical_scope() -> Program {
    let mut builder = ProgramBuilder::new("scope.js");
    let main = builder.script();
    let outer = builder.declare("outer");
    let helper = builder.declare("outer/helper");
    let inner = builder.declare("outer/inner");
    builder.define(helper, |_| {});
    builder.define(inner, |b| {
        let h = b.lexical_read(outer, "helper");
        b.call(h, &[]);
    });
    builder.define(outer, |b| {
        let h = b.closure(helper);
        b.lexical_write(outer, "helper", h);
        let i = b.closure(inner);
        b.ret(Some(i));
    });
    builder.define(main, |b| {
        let o = b.closure(outer);
        let returned = b.call(o, &[]);
        b.call(returned, &[]);
    });
    builder.build().expect("valid fixture")
}

/// Method stored and invoked through computed keys
///
/// ```js
/// var table = {};  table["handler"] = function handler() {};
/// table["handler"]();       // string key
/// table[0] = handler; table[1]();   // numeric keys
/// ```
pub fn fixture_computed_keys() -> Program {
    let mut builder = ProgramBuilder::new("keys.js");
    let main = builder.script();
    let handler = builder.declare("handler");
    let indexed = builder.declare("indexed");
    builder.define(handler, |_| {});
    builder.define(indexed, |_| {});
    builder.define(main, |b| {
        let table = b.new_object();
        let name = b.string("handler");
        let h = b.closure(handler);
        b.put_dynamic(table, name, h);
        let read = b.get_dynamic(table, name);
        b.call_method(read, table, &[]);

        let zero = b.number(0.0);
        let one = b.number(1.0);
        let i = b.closure(indexed);
        b.put_dynamic(table, zero, i);
        let element = b.get_dynamic(table, one);
        b.call_method(element, table, &[]);
    });
    builder.build().expect("valid fixture")
}
