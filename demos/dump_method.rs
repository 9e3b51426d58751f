use jvmcode::bytecode::rewriter::{quicken, rewrite, CacheIndexAllocator};
use jvmcode::bytecode::stream::InstructionStream;
use jvmcode::bytecode::{decode_at, DecodedView};
use jvmcode::runtime::code::CodeBuffer;
use jvmcode::runtime::memory::{InMemoryPool, SimpleLinkResolver};
use jvmcode::runtime::{DetachedThread, Method, ResolvedField};
use jvmcode::types::{BasicType, Symbol};
use jvmcode::Opcode;
use std::error::Error;
use std::sync::Arc;

fn main() {
    // Do everything else with the error trap
    match dump_method() {
        Ok(_) => {
            println!("All done");
        }
        Err(e) => {
            println!("Aborted due to error: {}", e);
        }
    }
}

/* Links a small method, quickens its field access and prints every instruction */
fn dump_method() -> Result<(), Box<dyn Error>> {
    let mut b = InMemoryPool::builder();
    let x = b.field_ref("demo/Point", "x", "I");
    let scale = b.method_ref("demo/Point", "scale", "(I)I");
    let greeting = b.string("hello");
    let pool = Arc::new(b.build());

    let mut code = vec![Opcode::ALOAD_0.byte()];
    code.push(Opcode::GETFIELD.byte());
    code.extend_from_slice(&x.to_be_bytes());
    code.push(Opcode::INVOKESTATIC.byte());
    code.extend_from_slice(&scale.to_be_bytes());
    code.push(Opcode::TABLESWITCH.byte());
    while code.len() % 4 != 0 {
        code.push(0);
    }
    for v in [21i32, 0, 1, 21, 23] {
        code.extend_from_slice(&v.to_be_bytes());
    }
    code.push(Opcode::LDC.byte());
    code.push(greeting as u8);
    code.push(Opcode::ARETURN.byte());

    // Link: switch member references to cache indices
    let mut code = CodeBuffer::from(code);
    let mut allocator = CacheIndexAllocator::new();
    let summary = rewrite(&mut code, pool.as_ref(), &mut allocator)?;
    pool.install_cache(allocator.into_cache(0))?;
    println!("rewrite: {:?}", summary);

    let method = Method::with_code(Symbol::new("demo/Point"), Symbol::new("describe"), Symbol::new("()Ljava/lang/Object;"), code, pool);

    let mut resolver = SimpleLinkResolver::new();
    resolver.add_field(ResolvedField {
        holder: Symbol::new("demo/Point"),
        name: Symbol::new("x"),
        field_type: BasicType::Int,
        offset: 12,
        is_static: false,
    });
    quicken(&method, 1, &resolver, &DetachedThread)?;
    quicken(&method, 0, &resolver, &DetachedThread)?;

    println!("{} {:?}", method, method.code());
    for cursor in InstructionStream::new(&method) {
        let bci = cursor.bci();
        let name = cursor.formats().name(cursor.raw_opcode());
        match decode_at(&method, bci) {
            DecodedView::MemberRef(view) => {
                println!("{:4}: {} #{} {}.{}:{}", bci, name, view.pool_index()?, view.holder_name()?, view.name()?, view.signature()?);
            }
            DecodedView::LoadConstant(view) => {
                println!("{:4}: {} #{} {:?}", bci, name, view.pool_index()?, view.resolve_constant(&DetachedThread)?);
            }
            DecodedView::TableSwitch(view) => {
                println!("{:4}: {} {}..={} default {:+}", bci, name, view.low_key(), view.high_key(), view.default_offset());
                for key in view.low_key()..=view.high_key() {
                    println!("        {} -> {:+}", key, view.dest_offset_for(key));
                }
            }
            DecodedView::LookupSwitch(view) => {
                println!("{:4}: {} {} pairs default {:+}", bci, name, view.number_of_pairs(), view.default_offset());
            }
            DecodedView::TypeRef(view) => {
                println!("{:4}: {} {}", bci, name, view.class_name()?);
            }
            DecodedView::Plain(c) => match c.branch_destination() {
                Some(dest) => println!("{:4}: {} -> {}", bci, name, dest),
                None => println!("{:4}: {}", bci, name),
            },
        }
    }
    Ok(())
}
