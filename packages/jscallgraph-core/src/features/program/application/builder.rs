//! Fluent program construction
//!
//! Used by tests, benches and front-ends that produce IR in memory instead of through a JSON
//! document.
//!
//! # Usage
//! ```text
//! let mut builder = ProgramBuilder::new("app.js");
//! let f = builder.declare("f");
//! let main = builder.script();
//! builder.define(f, |b| {
//!     let x = b.param();
//!     b.ret(Some(x));
//! });
//! builder.define(main, |b| {
//!     let f_obj = b.closure(f);
//!     let arg = b.new_object();
//!     b.call(f_obj, &[arg]);
//! });
//! let program = builder.build()?;
//! ```

use crate::errors::Result;
use crate::features::program::domain::{
    CallInstruction, CallKind, ConstantValue, Function, Instruction, Position, Program,
};
use crate::shared::{FunctionId, VarId};

/// Builds a [`Program`]; the first declared script is the entry point unless others are added
#[derive(Debug)]
pub struct ProgramBuilder {
    file: String,
    functions: Vec<Function>,
    entry_points: Vec<FunctionId>,
}

impl ProgramBuilder {
    /// Create a builder whose functions are named after `file`
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            functions: Vec::new(),
            entry_points: Vec::new(),
        }
    }

    /// Declare the script body (`L<file>`) and register it as an entry point
    pub fn script(&mut self) -> FunctionId {
        let name = format!("L{}", self.file);
        let id = self.push(name);
        self.entry_points.push(id);
        id
    }

    /// Declare a function `L<file>/<path>` with an empty body
    pub fn declare(&mut self, path: &str) -> FunctionId {
        let name = format!("L{}/{}", self.file, path);
        self.push(name)
    }

    fn push(&mut self, name: String) -> FunctionId {
        let id = self.functions.len() as FunctionId;
        let mut function = Function::new(id, name);
        function.file = Some(self.file.clone());
        self.functions.push(function);
        id
    }

    /// Register an additional entry point
    pub fn entry(&mut self, function: FunctionId) -> &mut Self {
        if !self.entry_points.contains(&function) {
            self.entry_points.push(function);
        }
        self
    }

    /// Define the body of a declared function
    ///
    /// # Panics
    /// If `function` was not returned by [`declare`](Self::declare) or [`script`](Self::script).
    pub fn define(&mut self, function: FunctionId, body: impl FnOnce(&mut FunctionBuilder)) {
        let mut builder = FunctionBuilder::new();
        body(&mut builder);
        let target = &mut self.functions[function as usize];
        target.this_param = builder.this_param;
        target.params = builder.params;
        target.instructions = builder.instructions;
        target.positions = builder.positions.into_iter().collect();
    }

    /// Finish and validate
    pub fn build(self) -> Result<Program> {
        let program = Program {
            functions: self.functions,
            entry_points: self.entry_points,
        };
        program.validate()?;
        Ok(program)
    }
}

/// Builds one function body, handing out fresh SSA values
#[derive(Debug)]
pub struct FunctionBuilder {
    next_var: VarId,
    this_param: VarId,
    params: Vec<VarId>,
    instructions: Vec<Instruction>,
    positions: Vec<(u32, Position)>,
    pending_position: Option<Position>,
}

impl FunctionBuilder {
    fn new() -> Self {
        Self {
            next_var: 1,
            this_param: 0,
            params: Vec::new(),
            instructions: Vec::new(),
            positions: Vec::new(),
            pending_position: None,
        }
    }

    fn fresh(&mut self) -> VarId {
        let var = self.next_var;
        self.next_var += 1;
        var
    }

    fn emit(&mut self, inst: Instruction) {
        if let Some(position) = self.pending_position.take() {
            self.positions
                .push((self.instructions.len() as u32, position));
        }
        self.instructions.push(inst);
    }

    /// `this`
    pub fn this(&self) -> VarId {
        self.this_param
    }

    /// Next formal parameter
    pub fn param(&mut self) -> VarId {
        let var = self.fresh();
        self.params.push(var);
        var
    }

    /// Attach a source position to the next emitted instruction
    pub fn at(&mut self, line: u32, column: u32) -> &mut Self {
        self.pending_position = Some(Position { line, column });
        self
    }

    pub fn new_object(&mut self) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::NewObject { dst });
        dst
    }

    pub fn new_array(&mut self) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::NewArray { dst });
        dst
    }

    pub fn closure(&mut self, function: FunctionId) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::Closure { dst, function });
        dst
    }

    pub fn constant(&mut self, value: ConstantValue) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::Constant { dst, value });
        dst
    }

    pub fn string(&mut self, value: &str) -> VarId {
        self.constant(ConstantValue::String(value.to_string()))
    }

    pub fn number(&mut self, value: f64) -> VarId {
        self.constant(ConstantValue::Number(value))
    }

    pub fn copy(&mut self, src: VarId) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::Copy { dst, src });
        dst
    }

    pub fn phi(&mut self, sources: &[VarId]) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::Phi {
            dst,
            sources: sources.to_vec(),
        });
        dst
    }

    pub fn get(&mut self, object: VarId, property: &str) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::GetProperty {
            dst,
            object,
            property: property.to_string(),
        });
        dst
    }

    pub fn put(&mut self, object: VarId, property: &str, value: VarId) {
        self.emit(Instruction::PutProperty {
            object,
            property: property.to_string(),
            value,
        });
    }

    pub fn get_dynamic(&mut self, object: VarId, key: VarId) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::GetDynamic { dst, object, key });
        dst
    }

    pub fn put_dynamic(&mut self, object: VarId, key: VarId, value: VarId) {
        self.emit(Instruction::PutDynamic { object, key, value });
    }

    pub fn global_read(&mut self, name: &str) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::GlobalRead {
            dst,
            name: name.to_string(),
        });
        dst
    }

    pub fn global_write(&mut self, name: &str, value: VarId) {
        self.emit(Instruction::GlobalWrite {
            name: name.to_string(),
            value,
        });
    }

    pub fn lexical_read(&mut self, definer: FunctionId, name: &str) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::LexicalRead {
            dst,
            name: name.to_string(),
            definer,
        });
        dst
    }

    pub fn lexical_write(&mut self, definer: FunctionId, name: &str, value: VarId) {
        self.emit(Instruction::LexicalWrite {
            name: name.to_string(),
            definer,
            value,
        });
    }

    fn invoke(
        &mut self,
        callee: VarId,
        receiver: Option<VarId>,
        args: &[VarId],
        kind: CallKind,
    ) -> VarId {
        let dst = self.fresh();
        self.emit(Instruction::Invoke(CallInstruction {
            dst: Some(dst),
            callee,
            receiver,
            args: args.to_vec(),
            kind,
        }));
        dst
    }

    /// `callee(args...)`
    pub fn call(&mut self, callee: VarId, args: &[VarId]) -> VarId {
        self.invoke(callee, None, args, CallKind::Call)
    }

    /// `receiver.<callee>(args...)` where `callee` was already read from `receiver`
    pub fn call_method(&mut self, callee: VarId, receiver: VarId, args: &[VarId]) -> VarId {
        self.invoke(callee, Some(receiver), args, CallKind::Call)
    }

    /// `receiver.property(args...)`, emitting the property read
    pub fn invoke_property(&mut self, receiver: VarId, property: &str, args: &[VarId]) -> VarId {
        let callee = self.get(receiver, property);
        self.call_method(callee, receiver, args)
    }

    /// `new callee(args...)`
    pub fn construct(&mut self, callee: VarId, args: &[VarId]) -> VarId {
        self.invoke(callee, None, args, CallKind::Construct)
    }

    pub fn ret(&mut self, value: Option<VarId>) {
        self.emit(Instruction::Return { value });
    }
}
