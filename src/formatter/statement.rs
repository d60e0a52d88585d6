use crate::parser::ast::{Parameter, Statement};

use super::{Format, FormatterContext};

impl<T> Format for Statement<T> {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        match self {
            Statement::Expression(expression) => {
                expression.format(ctx)?;
                ctx.write(";")
            }
            Statement::Print(print) => {
                ctx.write("print ")?;
                print.value.format(ctx)?;
                ctx.write(";")
            }
            Statement::Constant(constant) => {
                ctx.write("const ")?;
                ctx.write(&constant.id.name)?;
                if let Some(type_name) = &constant.type_name {
                    ctx.write(" ")?;
                    ctx.write(&type_name.name)?;
                }
                ctx.write(" = ")?;
                constant.value.format(ctx)?;
                ctx.write(";")
            }
            Statement::Variable(variable) => {
                ctx.write("var ")?;
                ctx.write(&variable.id.name)?;
                if let Some(type_name) = &variable.type_name {
                    ctx.write(" ")?;
                    ctx.write(&type_name.name)?;
                }
                if let Some(value) = &variable.value {
                    ctx.write(" = ")?;
                    value.format(ctx)?;
                }
                ctx.write(";")
            }
            Statement::If(if_statement) => {
                ctx.write("if ")?;
                if_statement.condition.format(ctx)?;
                ctx.write(" ")?;
                if_statement.if_block.format(ctx)?;
                if let Some(else_block) = &if_statement.else_block {
                    ctx.write(" else ")?;
                    else_block.format(ctx)?;
                }
                Ok(())
            }
            Statement::WhileLoop(while_loop) => {
                ctx.write("while ")?;
                while_loop.condition.format(ctx)?;
                ctx.write(" ")?;
                while_loop.block.format(ctx)
            }
            Statement::Break(_) => ctx.write("break;"),
            Statement::Continue(_) => ctx.write("continue;"),
            Statement::Return(return_statement) => {
                ctx.write("return ")?;
                return_statement.value.format(ctx)?;
                ctx.write(";")
            }
            Statement::Function(function) => {
                ctx.write("func ")?;
                ctx.write(&function.id.name)?;
                ctx.write("(")?;
                for (index, parameter) in function.parameters.iter().enumerate() {
                    if index > 0 {
                        ctx.write(", ")?;
                    }
                    parameter.format(ctx)?;
                }
                ctx.write(")")?;
                if let Some(return_type) = &function.return_type {
                    ctx.write(" ")?;
                    ctx.write(&return_type.name)?;
                }
                ctx.write(" ")?;
                function.block.format(ctx)
            }
            Statement::Block(block) => block.format(ctx),
        }
    }
}

impl<T> Format for Parameter<T> {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        ctx.write(&self.id.name)?;
        ctx.write(" ")?;
        ctx.write(&self.type_name.name)?;
        if let Some(default) = &self.default {
            ctx.write(" = ")?;
            default.format(ctx)?;
        }
        Ok(())
    }
}
