use crate::ast::{BinOp, Expr, Function, Program, Stmt};
use crate::builtins::Builtin;
use crate::error::CodegenError;


/// Lowers a program to a WebAssembly Text module. Output is deterministic:
/// the same AST always produces the same bytes, so golden-file comparison
/// is safe.
pub struct WatCodegen<'a> {
    builtins: &'a [Builtin],
    loop_counter: usize,
}

impl<'a> WatCodegen<'a> {
    pub fn new(builtins: &'a [Builtin]) -> Self {
        WatCodegen {
            builtins,
            loop_counter: 0,
        }
    }

    /// Emits, in order: deduplicated built-in imports, one function per
    /// user declaration, a synthesized `$main` wrapping any top-level
    /// non-declaration statements, and a start directive for it.
    pub fn generate(&mut self, program: &Program) -> Result<String, CodegenError> {
        self.loop_counter = 0;

        let imports = self.collect_imports(program);
        let mut code = String::from("(module\n");
        code.push_str(&imports.join(" "));
        code.push('\n');

        for stmt in &program.body {
            if let Stmt::Function(func) = stmt {
                code.push_str(&self.gen_function(func)?);
            }
        }

        let has_entry = program
            .body
            .iter()
            .any(|stmt| !matches!(stmt, Stmt::Function(_)));
        if !has_entry {
            code.push_str(")\n");
            return Ok(code);
        }

        code.push_str("\n(func $main\n");
        for stmt in &program.body {
            if !matches!(stmt, Stmt::Function(_)) {
                code.push_str(&self.gen_statement(stmt)?);
            }
        }
        code.push_str("(drop)\n(return))\n");
        code.push_str("(start $main))\n");
        Ok(code)
    }

    // Pre-pass walking the entire AST for calls to registered built-ins.
    // Each import declaration is recorded once, in discovery order.
    fn collect_imports(&self, program: &Program) -> Vec<&'static str> {
        let mut imports = Vec::new();
        self.collect_from_block(&program.body, &mut imports);
        imports
    }

    fn collect_from_block(&self, body: &[Stmt], imports: &mut Vec<&'static str>) {
        for stmt in body {
            match stmt {
                Stmt::Expr(expr) | Stmt::Return(expr) => self.collect_from_expr(expr, imports),
                Stmt::Let { value, .. } | Stmt::Assign { value, .. } => {
                    self.collect_from_expr(value, imports)
                }
                Stmt::Function(func) => self.collect_from_block(&func.body, imports),
                Stmt::If {
                    condition,
                    then_body,
                    else_body,
                } => {
                    self.collect_from_expr(condition, imports);
                    self.collect_from_block(then_body, imports);
                    if let Some(else_body) = else_body {
                        self.collect_from_block(else_body, imports);
                    }
                }
                Stmt::While { condition, body } => {
                    self.collect_from_expr(condition, imports);
                    self.collect_from_block(body, imports);
                }
            }
        }
    }

    fn collect_from_expr(&self, expr: &Expr, imports: &mut Vec<&'static str>) {
        match expr {
            Expr::Number(_) | Expr::Variable(_) => {}
            Expr::BinOp { left, right, .. } => {
                self.collect_from_expr(left, imports);
                self.collect_from_expr(right, imports);
            }
            Expr::Call { name, args } => {
                if let Some(builtin) = self.builtins.iter().find(|b| b.name == name.as_str()) {
                    if !imports.contains(&builtin.wat_import) {
                        imports.push(builtin.wat_import);
                    }
                }
                for arg in args {
                    self.collect_from_expr(arg, imports);
                }
            }
        }
    }

    fn gen_function(&mut self, func: &Function) -> Result<String, CodegenError> {
        let mut code = format!("(func ${} ", func.name);
        for param in &func.params {
            code.push_str(&format!("(param ${param} f32) "));
        }
        code.push_str("(result f32)\n");

        // When the body ends in a return, the ifs directly in the body
        // never have to produce a value, so they lower to the void form.
        let has_tail_return = matches!(func.body.last(), Some(Stmt::Return(_)));
        for stmt in &func.body {
            if let Stmt::If {
                condition,
                then_body,
                else_body,
            } = stmt
            {
                code.push_str(&self.gen_if(
                    condition,
                    then_body,
                    else_body.as_deref(),
                    has_tail_return,
                )?);
                continue;
            }
            code.push_str(&self.gen_statement(stmt)?);
        }
        code.push_str(")\n");
        Ok(code)
    }

    fn gen_statement(&mut self, stmt: &Stmt) -> Result<String, CodegenError> {
        match stmt {
            Stmt::Expr(expr) => Ok(self.gen_expr(expr)),
            Stmt::Return(expr) => Ok(format!("{}(return)\n", self.gen_expr(expr))),
            Stmt::Let { name, value } => Ok(format!(
                "(local ${name} f32) {}\n(local.set ${name})\n",
                self.gen_expr(value)
            )),
            Stmt::Assign { name, value } => {
                Ok(format!("{}(local.set ${name})\n", self.gen_expr(value)))
            }
            Stmt::If {
                condition,
                then_body,
                else_body,
            } => self.gen_if(condition, then_body, else_body.as_deref(), false),
            Stmt::While { condition, body } => self.gen_while(condition, body),
            Stmt::Function(_) => Err(CodegenError::UnsupportedConstruct(
                "function declaration nested inside another body",
            )),
        }
    }

    fn gen_if(
        &mut self,
        condition: &Expr,
        then_body: &[Stmt],
        else_body: Option<&[Stmt]>,
        tail_return: bool,
    ) -> Result<String, CodegenError> {
        let mut code = self.gen_expr(condition);
        if tail_return {
            code.push_str("(if\n");
        } else {
            code.push_str("(if (result f32)\n");
        }
        code.push_str("(then\n");
        for stmt in then_body {
            code.push_str(&self.gen_statement(stmt)?);
        }
        code.push_str(")\n");
        if let Some(else_body) = else_body {
            code.push_str("(else\n");
            for stmt in else_body {
                code.push_str(&self.gen_statement(stmt)?);
            }
            code.push_str(")\n");
        }
        code.push_str(")\n");
        Ok(code)
    }

    fn gen_while(&mut self, condition: &Expr, body: &[Stmt]) -> Result<String, CodegenError> {
        // Labels are unique across the whole module; one counter scope per
        // generate run.
        let label = format!("$loop_{}", self.loop_counter);
        self.loop_counter += 1;

        let mut code = format!("(loop {label}\n");
        code.push_str(&self.gen_expr(condition));
        code.push_str(&format!("br_if {label}"));
        for stmt in body {
            code.push_str(&self.gen_statement(stmt)?);
        }
        code.push_str("\n)");
        Ok(code)
    }

    fn gen_expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Number(value) => format!("(f32.const {value})\n"),
            Expr::Variable(name) => format!("(local.get ${name})\n"),
            Expr::BinOp {
                operator,
                left,
                right,
            } => {
                let mut code = self.gen_expr(left);
                code.push_str(&self.gen_expr(right));
                code.push_str(match operator {
                    BinOp::Add => "(f32.add)\n",
                    BinOp::Sub => "(f32.sub)\n",
                    BinOp::Mul => "(f32.mul)\n",
                    BinOp::Div => "(f32.div)\n",
                    BinOp::Greater => "(f32.gt)\n",
                    BinOp::Less => "(f32.lt)\n",
                    BinOp::Eq => "(f32.eq)\n",
                    BinOp::NotEq => "(f32.ne)\n",
                });
                code
            }
            Expr::Call { name, args } => {
                let mut code = String::new();
                for arg in args {
                    code.push_str(&self.gen_expr(arg));
                }
                // Built-in calls are redirected to the import's symbol.
                let target = match self.builtins.iter().find(|b| b.name == name.as_str()) {
                    Some(builtin) => builtin.wat_symbol.to_string(),
                    None => format!("${name}"),
                };
                code.push_str(&format!("(call {target})\n"));
                code
            }
        }
    }
}
