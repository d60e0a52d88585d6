use crate::parser::ast::{Block, Expression, Num};

use super::{Format, FormatterContext};

impl<T> Format for Expression<T> {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        match self {
            Expression::Id(id) => ctx.write(&id.name),
            Expression::Num(Num::Integer(lexeme, _, _)) => ctx.write(lexeme),
            Expression::Num(Num::FloatingPoint(lexeme, _, _)) => ctx.write(lexeme),
            Expression::Character(character) => ctx.write(&character.lexeme),
            Expression::Bool(value) => ctx.write(if value.value { "true" } else { "false" }),
            Expression::Binary(binary) => {
                binary.lhs.format(ctx)?;
                ctx.write(format!(" {} ", binary.op))?;
                binary.rhs.format(ctx)
            }
            Expression::Relation(relation) => {
                relation.lhs.format(ctx)?;
                ctx.write(format!(" {} ", relation.op))?;
                relation.rhs.format(ctx)
            }
            Expression::Logical(logical) => {
                logical.lhs.format(ctx)?;
                ctx.write(format!(" {} ", logical.op))?;
                logical.rhs.format(ctx)
            }
            Expression::Prefix(prefix) => {
                ctx.write(prefix.op.to_string())?;
                prefix.inner.format(ctx)
            }
            Expression::Grouped(inner) => {
                ctx.write("(")?;
                inner.format(ctx)?;
                ctx.write(")")
            }
            Expression::Assignment(assignment) => {
                assignment.lvalue.format(ctx)?;
                ctx.write(" = ")?;
                assignment.rvalue.format(ctx)
            }
            Expression::Block(block) => block.format(ctx),
            Expression::Call(call) => {
                ctx.write(&call.id.name)?;
                ctx.write("(")?;
                for (index, argument) in call.arguments.iter().enumerate() {
                    if index > 0 {
                        ctx.write(", ")?;
                    }
                    argument.format(ctx)?;
                }
                ctx.write(")")
            }
        }
    }
}

impl<T> Format for Block<T> {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        ctx.write("{")?;
        ctx.newline()?;
        ctx.indent();

        for statement in &self.statements {
            ctx.write_indent()?;
            statement.format(ctx)?;
            ctx.newline()?;
        }

        ctx.dedent();
        ctx.write_indent()?;
        ctx.write("}")
    }
}
